use std::sync::Arc;

use sqlx::PgPool;

use crate::analysis_client::ResumeAnalyzer;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Remote analysis backend. Default: `AnalysisClient` pointed at `ANALYSIS_SERVICE_URL`.
    pub analyzer: Arc<dyn ResumeAnalyzer>,
    pub config: Config,
}
