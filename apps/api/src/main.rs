mod config;
mod db;
mod errors;
mod mailer;
mod models;
mod repository;
mod routes;
mod state;
mod storage;
mod submission;
#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::mailer::{Notifier, ResendMailer};
use crate::repository::PgCandidatureRepository;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::S3ResumeStore;
use crate::submission::pipeline::SubmissionPipeline;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting intake API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    ensure_schema(&db).await?;

    // Initialize S3 / MinIO
    let store = S3ResumeStore::from_config(&config).await;
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    // Mail is decided here, once, for the lifetime of the process
    let notifier = match &config.mail {
        Some(mail) => {
            let mailer = ResendMailer::new(mail.resend_api_key.clone(), mail.from.clone())?;
            info!(
                "Resend mailer initialized (recruiting address: {})",
                mail.recruiting_address
            );
            Notifier::new(Arc::new(mailer), mail.recruiting_address.clone())
        }
        None => Notifier::disabled(),
    };
    if !notifier.is_enabled() {
        warn!("RESEND_API_KEY not set; confirmation and recruiting emails are disabled");
    }

    let pipeline = SubmissionPipeline::new(
        Arc::new(store),
        Arc::new(PgCandidatureRepository::new(db)),
        notifier,
        config.company_name.clone(),
    );

    // Build app state
    let state = AppState {
        pipeline: Arc::new(pipeline),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CatchPanicLayer::custom(errors::panic_response))
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
