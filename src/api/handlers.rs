use super::{ApiError, AppState};
use crate::scan::{ScanParams, ScanResult};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde_json::{json, Value};

pub async fn index() -> Json<Value> {
    Json(json!({ "message": "BTC POP Scanner API running" }))
}

pub async fn scan(
    State(state): State<AppState>,
    query: Result<Query<ScanParams>, QueryRejection>,
) -> Result<Json<ScanResult>, ApiError> {
    let Query(params) = query.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected scan query");
        ApiError::BadRequest(rejection.body_text())
    })?;
    tracing::info!(?params, "Scan requested");

    let result = state.scanner.scan(params).await.map_err(|e| {
        tracing::warn!(error = %e, "Scan failed");
        ApiError::from(e)
    })?;

    Ok(Json(result))
}
