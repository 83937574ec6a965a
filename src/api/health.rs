use axum::{extract::State, Json};

use crate::error::Result;

use super::routes::ApiState;

/// Liveness plus a database round-trip.
pub async fn health(State(state): State<ApiState>) -> Result<Json<serde_json::Value>> {
    state.store.ping().await?;
    Ok(Json(serde_json::json!({ "status": "ok" })))
}
