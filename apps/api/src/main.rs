mod analysis;
mod analysis_client;
mod config;
mod errors;
mod history;
mod models;
mod routes;
mod scoring;
mod state;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis_client::AnalysisClient;
use crate::config::Config;
use crate::history::store::{create_pool, run_migrations};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resumatch API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (analysis history)
    let db = create_pool(&config.database_url).await?;
    run_migrations(&db)
        .await
        .context("Failed to run database migrations")?;

    // Initialize the remote analysis client
    let client = AnalysisClient::new(&config.analysis_service_url, config.analysis_timeout)
        .context("Failed to build analysis service client")?;
    info!("Analysis client initialized (endpoint: {})", client.endpoint());

    let state = AppState {
        db,
        analyzer: Arc::new(client),
        config: config.clone(),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&config)?),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Permissive when `FRONTEND_URL` is unset; otherwise an explicit allow-list.
fn cors_layer(config: &Config) -> Result<CorsLayer> {
    let Some(origins) = config.allowed_origins() else {
        info!("FRONTEND_URL not set, allowing all origins");
        return Ok(CorsLayer::permissive());
    };

    let origins = origins
        .iter()
        .map(|o| HeaderValue::from_str(o).with_context(|| format!("Invalid CORS origin '{o}'")))
        .collect::<Result<Vec<_>>>()?;
    info!("CORS restricted to {} origins", origins.len());

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any))
}
