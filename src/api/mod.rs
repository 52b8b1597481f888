//! HTTP API module
//!
//! A small local status API: read the countdown, check liveness, and send
//! the same commands the MQTT topic accepts.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .route("/adjust", post(adjust_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
