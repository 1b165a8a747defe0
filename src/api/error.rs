use crate::scan::ScanError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    /// Request parameters failed validation
    BadRequest(String),
    /// Upstream market data unavailable
    BadGateway(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
        };

        (status, axum::Json(json!({ "error": msg }))).into_response()
    }
}

impl From<ScanError> for ApiError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::Validation(_) => ApiError::BadRequest(err.to_string()),
            ScanError::Spot(_) | ScanError::Instruments(_) => ApiError::BadGateway(err.to_string()),
        }
    }
}
