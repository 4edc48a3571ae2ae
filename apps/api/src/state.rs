use std::sync::Arc;

use crate::config::Config;
use crate::submission::pipeline::SubmissionPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Storage, repository and notifier wired once at startup.
    pub pipeline: Arc<SubmissionPipeline>,
    pub config: Config,
}
