use super::{AuthError, NotifyError};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Failure of an API request, rendered as the endpoint's JSON error body
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Missing authorization header")]
    MissingAuthorization,

    #[error("{0}")]
    Unauthorized(#[from] AuthError),

    #[error("{0}")]
    InvalidBody(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("{0}")]
    Notify(#[from] NotifyError),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Unauthorized(AuthError::Jwks(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "message": self.to_string() }),
            ),
            ApiError::MissingAuthorization | ApiError::Unauthorized(_) => {
                (StatusCode::UNAUTHORIZED, json!({ "message": self.to_string() }))
            }
            ApiError::InvalidBody(errors) => {
                (StatusCode::BAD_REQUEST, json!({ "success": false, "errors": errors }))
            }
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({ "success": false, "error": self.to_string() }),
            ),
            ApiError::Notify(_) | ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "success": false, "error": self.to_string() }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
