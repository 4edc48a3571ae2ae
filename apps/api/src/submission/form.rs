//! Multipart form parsing and validation.
//!
//! Nothing here touches the network: a form either becomes an
//! `ApplicationSubmission` or a `Validation` error before any external call.

use axum::extract::Multipart;
use tracing::warn;

use crate::errors::AppError;
use crate::models::application::{ApplicationSubmission, Position, ResumeFile};
use crate::storage::{content_type_for, extension};

pub const MISSING_FIELDS_MESSAGE: &str = "Tous les champs obligatoires doivent être remplis";
const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

/// Raw field values exactly as posted, before any validation.
#[derive(Debug, Default, Clone)]
pub struct RawForm {
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub email: Option<String>,
    pub telephone: Option<String>,
    pub poste: Option<String>,
    pub ville: Option<String>,
    pub quartier: Option<String>,
    pub message: Option<String>,
    pub cv: Option<ResumeFile>,
}

/// Reads every part of the multipart body. Unknown parts are drained and
/// ignored.
pub async fn read_multipart(mut multipart: Multipart) -> Result<RawForm, AppError> {
    let mut form = RawForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Formulaire invalide: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "cv" {
            let file_name = field.file_name().unwrap_or("").to_string();
            let content_type = field.content_type().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Lecture du CV impossible: {e}")))?;
            let content_type = content_type
                .filter(|ct| !ct.is_empty() && ct != "application/octet-stream")
                .unwrap_or_else(|| content_type_for(&file_name).to_string());
            form.cv = Some(ResumeFile {
                file_name,
                content_type,
                data,
            });
            continue;
        }

        let slot = match name.as_str() {
            "nom" => &mut form.nom,
            "prenom" => &mut form.prenom,
            "email" => &mut form.email,
            "telephone" => &mut form.telephone,
            "poste" => &mut form.poste,
            "ville" => &mut form.ville,
            "quartier" => &mut form.quartier,
            "message" => &mut form.message,
            _ => {
                let _ = field.bytes().await;
                continue;
            }
        };
        let text = field
            .text()
            .await
            .map_err(|e| AppError::Validation(format!("Champ '{name}' illisible: {e}")))?;
        *slot = Some(text);
    }

    Ok(form)
}

impl RawForm {
    /// Field names that are required but absent, blank, or (for `cv`) empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        for (name, value) in [
            ("nom", &self.nom),
            ("prenom", &self.prenom),
            ("email", &self.email),
            ("telephone", &self.telephone),
            ("poste", &self.poste),
            ("ville", &self.ville),
        ] {
            if value.as_deref().map(str::trim).unwrap_or("").is_empty() {
                missing.push(name);
            }
        }
        let cv_present = self
            .cv
            .as_ref()
            .is_some_and(|cv| !cv.data.is_empty() && !cv.file_name.trim().is_empty());
        if !cv_present {
            missing.push("cv");
        }
        missing
    }

    pub fn validate(self, max_resume_bytes: usize) -> Result<ApplicationSubmission, AppError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            warn!("Submission missing required fields: {}", missing.join(", "));
            return Err(AppError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
        }

        let email = trimmed(self.email);
        if !looks_like_email(&email) {
            return Err(AppError::Validation(format!(
                "Adresse email invalide: {email}"
            )));
        }

        let poste = trimmed(self.poste);
        let position: Position = poste
            .parse()
            .map_err(|_| AppError::Validation(format!("Poste inconnu: {poste}")))?;

        // missing_fields() has already established the file is present.
        let Some(resume) = self.cv else {
            return Err(AppError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
        };
        let ext = extension(&resume.file_name).unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(AppError::Validation(
                "Format de CV non accepté. Formats acceptés : PDF, DOC, DOCX".to_string(),
            ));
        }
        if resume.size() > max_resume_bytes {
            return Err(AppError::Validation(format!(
                "Le fichier ne doit pas dépasser {}MB",
                max_resume_bytes / (1024 * 1024)
            )));
        }

        Ok(ApplicationSubmission {
            last_name: trimmed(self.nom),
            first_name: trimmed(self.prenom),
            email,
            phone: trimmed(self.telephone),
            position,
            city: trimmed(self.ville),
            district: trimmed(self.quartier),
            cover_message: self
                .message
                .map(|m| m.trim().to_string())
                .unwrap_or_default(),
            resume,
        })
    }
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}
