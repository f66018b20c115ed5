//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use tickgate_core::error::{AppError, ErrorKind};

use crate::dto::ErrorBody;

/// Handler error type. Wraps [`AppError`] so it can become a response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// Status code this error is answered with.
    pub fn status(&self) -> StatusCode {
        match self.0.kind {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
            ErrorKind::Authorization => StatusCode::FORBIDDEN,
            ErrorKind::NotImplemented => StatusCode::NOT_IMPLEMENTED,
            ErrorKind::ExternalService => StatusCode::BAD_GATEWAY,
            ErrorKind::ServiceUnavailable | ErrorKind::Cache => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Internal
            | ErrorKind::Configuration
            | ErrorKind::Session
            | ErrorKind::Serialization => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self.0.kind {
            // Never reveal why authentication failed.
            ErrorKind::Authentication => "Unauthorized".to_string(),
            ErrorKind::NotImplemented => "Not implemented".to_string(),
            _ if status.is_server_error() => {
                tracing::error!(kind = %self.0.kind, error = %self.0.message, "Request failed");
                status
                    .canonical_reason()
                    .unwrap_or("Internal Server Error")
                    .to_string()
            }
            _ => self.0.message,
        };

        (status, Json(ErrorBody::new(message))).into_response()
    }
}
