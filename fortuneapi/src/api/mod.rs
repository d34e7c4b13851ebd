pub mod rest;
pub mod ws;

use crate::core::prelude::*;
use axum::{routing::get, Router};

/// Builds the application router.
///
/// * `GET /health` - liveness probe
/// * `GET|POST /v1/fortune` - one fortune as JSON
/// * `GET /v1/ws` - websocket cookie session
///
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(rest::health))
        .route("/v1/fortune", get(rest::fortune).post(rest::fortune))
        .route("/v1/ws", get(ws::endpoint))
        .with_state(state)
}
