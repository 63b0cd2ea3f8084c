//! HTTP API server for Swirl notes and withdrawal proof inputs.

use std::sync::Arc;

use axum::Router;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

mod config;
mod handlers;
mod routes;


use config::ServerConfig;
use swirl_engine::{PoseidonHasher, ReplayCache, TREE_DEPTH};

/// Application state shared across handlers
pub struct AppState {
    pub hasher: Arc<PoseidonHasher>,
    pub cache: Arc<RwLock<ReplayCache>>,
}

impl AppState {
    pub fn new(hasher: Arc<PoseidonHasher>, config: &ServerConfig) -> Self {
        let cache = ReplayCache::with_params(&*hasher, TREE_DEPTH, config.checkpoint_interval);
        Self {
            hasher,
            cache: Arc::new(RwLock::new(cache)),
        }
    }
}

pub fn build_app(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let mut app = Router::new()
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http());

    if config.cors_allow_any {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app.with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting Swirl input server...");

    let config = ServerConfig::load().map_err(|e| {
        error!("failed to load config: {}", e);
        e
    })?;

    // One hasher for the whole process; parameter setup is not free.
    let hasher = Arc::new(PoseidonHasher::new()?);
    let state = Arc::new(AppState::new(hasher, &config));
    let app = build_app(state, &config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(
        addr = %config.bind_addr,
        checkpoint_interval = config.checkpoint_interval,
        "listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
