//! Axum router configuration with middleware.
//!
//! The event fabric talks to a single route: `/notifications` answers
//! OPTIONS for the validation handshake and POST for delivery.

use axum::routing::{get, options};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/notifications",
            options(handlers::notifications::validate).post(handlers::notifications::receive),
        )
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
