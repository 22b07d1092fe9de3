use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

pub type PortalResult<T> = Result<T, PortalError>;

/// Errors surfaced by the JSON endpoints. The HTML form never fails with a
/// status; it re-renders with a message instead.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("{0}")]
    BadRequest(String),
}

impl PortalError {
    fn status_code(&self) -> StatusCode {
        match self {
            PortalError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::warn!("Request failed with {}: {}", status, self);
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
