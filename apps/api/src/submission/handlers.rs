//! Axum route handler for the application intake endpoint.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;
use crate::submission::form::read_multipart;

pub const SUCCESS_MESSAGE: &str = "Candidature envoyée avec succès";

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
}

/// POST /api/submit-application
///
/// Validates the form, stores the résumé, records the candidature and
/// attempts both notification emails. Only validation, storage and
/// persistence failures are reported to the caller.
pub async fn handle_submit_application(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SubmitResponse>, AppError> {
    let multipart = multipart
        .map_err(|e| AppError::Validation(format!("Formulaire invalide: {}", e.body_text())))?;

    let submission = read_multipart(multipart)
        .await?
        .validate(state.config.max_resume_bytes)?;

    let processed = state.pipeline.process(submission).await?;
    info!(
        candidature_id = %processed.candidature_id,
        cv_url = %processed.cv_url,
        recruiter = ?processed.recruiter_delivery,
        applicant = ?processed.applicant_delivery,
        "Application processed"
    );

    Ok(Json(SubmitResponse {
        success: true,
        message: SUCCESS_MESSAGE.to_string(),
    }))
}
