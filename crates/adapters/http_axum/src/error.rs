//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use salesdesk_domain::error::SalesdeskError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`SalesdeskError`] to an HTTP response with appropriate status code.
pub struct ApiError(SalesdeskError);

impl From<SalesdeskError> for ApiError {
    fn from(err: SalesdeskError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            SalesdeskError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            SalesdeskError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            SalesdeskError::AccessDenied(err) => (StatusCode::FORBIDDEN, err.to_string()),
            SalesdeskError::SessionExpired => {
                (StatusCode::UNAUTHORIZED, "session expired".to_string())
            }
            SalesdeskError::Store(err) => {
                tracing::error!(error = %err, "store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            SalesdeskError::Transport(err) => {
                tracing::error!(error = %err, "transport error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
