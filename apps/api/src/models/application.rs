use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Positions an applicant can apply for.
///
/// The wire values are the ones the public form posts (`Coiffeur`, ...);
/// the kebab-case slugs are accepted as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    Hairdresser,
    NailTechnician,
    Esthetician,
    Other,
}

impl Position {
    /// Value stored in `candidatures.poste` and shown in notifications.
    pub fn label(self) -> &'static str {
        match self {
            Position::Hairdresser => "Coiffeur",
            Position::NailTechnician => "Prothese Ongulaire",
            Position::Esthetician => "Estheticienne",
            Position::Other => "Autre",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPosition(pub String);

impl fmt::Display for UnknownPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown position '{}'", self.0)
    }
}

impl FromStr for Position {
    type Err = UnknownPosition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "coiffeur" | "coiffeuse" | "hairdresser" => Ok(Position::Hairdresser),
            "prothese ongulaire" | "prothésiste ongulaire" | "nail-technician" => {
                Ok(Position::NailTechnician)
            }
            "estheticienne" | "esthéticienne" | "esthetician" => Ok(Position::Esthetician),
            "autre" | "other" => Ok(Position::Other),
            _ => Err(UnknownPosition(s.to_string())),
        }
    }
}

/// The uploaded résumé as received from the form.
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl ResumeFile {
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// A validated application, built once from the multipart form and never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct ApplicationSubmission {
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub phone: String,
    pub position: Position,
    pub city: String,
    pub district: String,
    pub cover_message: String,
    pub resume: ResumeFile,
}

impl ApplicationSubmission {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// `Dakar` or `Dakar, Plateau` when a district was given.
    pub fn location(&self) -> String {
        if self.district.is_empty() {
            self.city.clone()
        } else {
            format!("{}, {}", self.city, self.district)
        }
    }
}

/// Column values for one `candidatures` insert. `id` and `date_soumission`
/// are assigned by the repository and the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCandidature {
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub telephone: String,
    pub poste: String,
    pub ville: String,
    pub quartier: String,
    pub message: String,
    pub cv_url: String,
}

impl NewCandidature {
    pub fn from_submission(submission: &ApplicationSubmission, cv_url: &str) -> Self {
        Self {
            nom: submission.last_name.clone(),
            prenom: submission.first_name.clone(),
            email: submission.email.clone(),
            telephone: submission.phone.clone(),
            poste: submission.position.label().to_string(),
            ville: submission.city.clone(),
            quartier: submission.district.clone(),
            message: submission.cover_message.clone(),
            cv_url: cv_url.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_parses_form_values() {
        assert_eq!("Coiffeur".parse(), Ok(Position::Hairdresser));
        assert_eq!("Prothese Ongulaire".parse(), Ok(Position::NailTechnician));
        assert_eq!("Estheticienne".parse(), Ok(Position::Esthetician));
        assert_eq!("Autre".parse(), Ok(Position::Other));
    }

    #[test]
    fn test_position_parses_slugs_case_insensitively() {
        assert_eq!("NAIL-TECHNICIAN".parse(), Ok(Position::NailTechnician));
        assert_eq!(" hairdresser ".parse(), Ok(Position::Hairdresser));
    }

    #[test]
    fn test_position_rejects_unknown() {
        let err = "Barbier".parse::<Position>().unwrap_err();
        assert_eq!(err, UnknownPosition("Barbier".to_string()));
    }

    #[test]
    fn test_location_with_and_without_district() {
        let mut submission = crate::testing::submission();
        assert_eq!(submission.location(), "Dakar");
        submission.district = "Plateau".to_string();
        assert_eq!(submission.location(), "Dakar, Plateau");
    }

    #[test]
    fn test_new_candidature_carries_cv_url_and_label() {
        let submission = crate::testing::submission();
        let row = NewCandidature::from_submission(&submission, "https://cdn.test/cv/1-a.pdf");
        assert_eq!(row.poste, "Coiffeur");
        assert_eq!(row.cv_url, "https://cdn.test/cv/1-a.pdf");
        assert_eq!(row.nom, "Diop");
        assert_eq!(row.prenom, "Awa");
    }
}
