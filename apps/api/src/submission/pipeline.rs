//! The submission pipeline: store file → persist record → notify.
//!
//! Validation happens before `process` is ever called (see `form`). Steps
//! run strictly in order; a failure in storage or persistence aborts the
//! run, while notification failures are logged and swallowed. Nothing is
//! retried and nothing is rolled back: a persistence failure after a
//! successful upload leaves the uploaded file in place.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::mailer::templates::{applicant_confirmation, recruiter_notification};
use crate::mailer::{Delivery, MailError, Notifier};
use crate::models::application::{ApplicationSubmission, NewCandidature};
use crate::repository::CandidatureRepository;
use crate::storage::{resume_key, ResumeStore};

/// What a successful run produced. The record id stays server-side.
#[derive(Debug, Clone)]
pub struct ProcessedSubmission {
    pub candidature_id: Uuid,
    pub cv_url: String,
    pub recruiter_delivery: Result<Delivery, String>,
    pub applicant_delivery: Result<Delivery, String>,
}

pub struct SubmissionPipeline {
    store: Arc<dyn ResumeStore>,
    repository: Arc<dyn CandidatureRepository>,
    notifier: Notifier,
    company_name: String,
}

impl SubmissionPipeline {
    pub fn new(
        store: Arc<dyn ResumeStore>,
        repository: Arc<dyn CandidatureRepository>,
        notifier: Notifier,
        company_name: String,
    ) -> Self {
        Self {
            store,
            repository,
            notifier,
            company_name,
        }
    }

    pub async fn process(
        &self,
        submission: ApplicationSubmission,
    ) -> Result<ProcessedSubmission, AppError> {
        info!(
            position = %submission.position,
            city = %submission.city,
            resume_bytes = submission.resume.size(),
            "Processing application"
        );

        // 1. Store the résumé; its URL is part of the persisted row.
        let key = resume_key(Utc::now(), &submission.resume.file_name);
        let cv_url = self
            .store
            .put(
                &key,
                submission.resume.data.clone(),
                &submission.resume.content_type,
            )
            .await
            .map_err(|e| {
                error!("Résumé upload failed: {e}");
                AppError::Storage(e.to_string())
            })?;
        info!("Résumé stored at {cv_url}");

        // 2. Persist the record.
        let row = NewCandidature::from_submission(&submission, &cv_url);
        let candidature_id = self.repository.insert(&row).await.map_err(|e| {
            error!("Insert failed, résumé left at {cv_url}: {e}");
            AppError::Persistence(e.to_string())
        })?;
        info!("Candidature {candidature_id} recorded");

        // 3. Best-effort notifications; neither outcome affects the result.
        let (recruiter_delivery, applicant_delivery) = tokio::join!(
            self.notify_recruiters(&submission, &cv_url),
            self.notify_applicant(&submission),
        );

        Ok(ProcessedSubmission {
            candidature_id,
            cv_url,
            recruiter_delivery: logged("recruiting team", recruiter_delivery),
            applicant_delivery: logged("applicant", applicant_delivery),
        })
    }

    async fn notify_recruiters(
        &self,
        submission: &ApplicationSubmission,
        cv_url: &str,
    ) -> Result<Delivery, MailError> {
        let email = recruiter_notification(submission, cv_url, &self.company_name);
        self.notifier
            .send(self.notifier.recruiting_address(), &email.subject, &email.html)
            .await
    }

    async fn notify_applicant(
        &self,
        submission: &ApplicationSubmission,
    ) -> Result<Delivery, MailError> {
        let email = applicant_confirmation(submission, &self.company_name);
        self.notifier
            .send(&submission.email, &email.subject, &email.html)
            .await
    }
}

fn logged(
    audience: &str,
    delivery: Result<Delivery, MailError>,
) -> Result<Delivery, String> {
    match &delivery {
        Ok(Delivery::Sent(id)) => info!("Email to {audience} sent, id {id}"),
        Ok(Delivery::Skipped) => {}
        Err(e) => warn!("Email to {audience} failed, continuing: {e}"),
    }
    delivery.map_err(|e| e.to_string())
}
