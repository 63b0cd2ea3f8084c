//! API route definitions.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::AppState;

/// Create API routes
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Notes
        .route("/api/note/generate", post(handlers::generate_note))
        .route("/api/note/decode", post(handlers::decode_note))
        // Withdrawal inputs
        .route("/api/inputs/withdraw", post(handlers::withdraw_inputs))
        // Utility endpoints
        .route("/api/tree/zeros", get(handlers::tree_zeros))
}
