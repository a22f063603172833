pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::history::handlers as history;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route(
            "/api/v1/analyses",
            post(analysis::handle_analyze).get(history::handle_list_analyses),
        )
        .route("/api/v1/analyses/resolve", post(analysis::handle_resolve))
        // History API
        .route(
            "/api/v1/analyses/:id",
            get(history::handle_get_analysis).delete(history::handle_delete_analysis),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
