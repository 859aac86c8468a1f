use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use prodchart_core::config_file;
use prodchart_parsing::{ExtractorConfigBuilder, ReportExtractor};
use prodchart_pdf_mupdf::MupdfBackend;

mod error;
mod handlers;
mod models;
mod state;
mod template;
mod upload;

#[cfg(test)]
mod tests;

use state::AppState;

const DEFAULT_BIND: &str = "127.0.0.1:5000";
const DEFAULT_MAX_UPLOAD_MB: usize = 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("prodchart_web=info,prodchart_parsing=info,tower_http=info")
        }))
        .init();

    let file_config = config_file::load_config();
    let extractor_config = ExtractorConfigBuilder::from_config_file(&file_config).build()?;
    let extractor = ReportExtractor::with_config(extractor_config);

    let server = file_config.server.unwrap_or_default();
    let bind = std::env::var("PRODCHART_BIND")
        .ok()
        .or(server.bind)
        .unwrap_or_else(|| DEFAULT_BIND.to_string());
    let max_upload_mb = match std::env::var("PRODCHART_MAX_UPLOAD_MB") {
        Ok(v) => v.parse::<usize>().map_err(|e| {
            anyhow::anyhow!("PRODCHART_MAX_UPLOAD_MB must be a whole number: {e}")
        })?,
        Err(_) => server
            .max_upload_mb
            .map(|mb| mb as usize)
            .unwrap_or(DEFAULT_MAX_UPLOAD_MB),
    };

    tracing::info!(
        entities = ?extractor.entity_names(),
        max_upload_mb,
        "extractor ready"
    );

    let state = Arc::new(AppState {
        extractor,
        backend: Arc::new(MupdfBackend::new()),
    });

    let app = build_router(state, max_upload_mb * 1024 * 1024);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

pub(crate) fn build_router(state: Arc<AppState>, body_limit: usize) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::index::index).post(handlers::upload::upload),
        )
        .route("/api/upload", post(handlers::upload::upload))
        .route("/api/health", get(handlers::health::health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
