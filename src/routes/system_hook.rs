use axum::body::Bytes;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

/// `POST /` — diagnostic echo for arbitrary system-hook payloads. Not part
/// of the merge pipeline.
pub async fn system_hook(body: Bytes) -> Response {
    match serde_json::from_slice::<Value>(&body) {
        Ok(value) => Json(value).into_response(),
        Err(_) => (StatusCode::BAD_REQUEST, "invalid JSON").into_response(),
    }
}
