use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::application::NewCandidature;

/// Append-only store for submitted applications. There is no update or
/// delete path: a persisted candidature is immutable.
#[async_trait]
pub trait CandidatureRepository: Send + Sync {
    async fn insert(&self, candidature: &NewCandidature) -> Result<Uuid, sqlx::Error>;
}

pub struct PgCandidatureRepository {
    pool: PgPool,
}

impl PgCandidatureRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CandidatureRepository for PgCandidatureRepository {
    async fn insert(&self, c: &NewCandidature) -> Result<Uuid, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            INSERT INTO candidatures
                (id, nom, prenom, email, telephone, poste, ville, quartier, message,
                 cv_url, date_soumission)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW())
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&c.nom)
        .bind(&c.prenom)
        .bind(&c.email)
        .bind(&c.telephone)
        .bind(&c.poste)
        .bind(&c.ville)
        .bind(&c.quartier)
        .bind(&c.message)
        .bind(&c.cv_url)
        .fetch_one(&self.pool)
        .await
    }
}
