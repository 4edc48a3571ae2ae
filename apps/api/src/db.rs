use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS candidatures (
    id              UUID PRIMARY KEY,
    nom             TEXT NOT NULL,
    prenom          TEXT NOT NULL,
    email           TEXT NOT NULL,
    telephone       TEXT NOT NULL,
    poste           TEXT NOT NULL,
    ville           TEXT NOT NULL,
    quartier        TEXT NOT NULL DEFAULT '',
    message         TEXT NOT NULL DEFAULT '',
    cv_url          TEXT NOT NULL,
    date_soumission TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the `candidatures` table if it does not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(SCHEMA)
        .execute(pool)
        .await
        .context("Failed to apply candidatures schema")?;
    info!("Schema ready");
    Ok(())
}
