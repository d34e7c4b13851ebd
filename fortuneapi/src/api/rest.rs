use crate::core::prelude::*;
use crate::domain::prelude::*;
use axum::{extract::State, Json};
use tracing::info;

/// Handler for `GET|POST /v1/fortune`.
///
/// Returns a freshly generated fortune, or `502` with
/// `{"error": "fortune generation failed"}` when the backend is unreachable.
///
pub async fn fortune(State(state): State<AppState>) -> Result<Json<FortuneRecord>, ApiError> {
    info!("fortune requested");
    let record = state.generator.generate().await?;
    Ok(Json(record))
}

pub async fn health() -> &'static str {
    "ok"
}
