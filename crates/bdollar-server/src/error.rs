//! Error types for the token server.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bdollar_common::ErrorResponse;
use thiserror::Error;
use tracing::{error, warn};

/// Errors that can occur while starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// I/O error (socket binding, config file reads, signal registration).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using `ServerError`.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Request-level failures, rendered as an [`ErrorResponse`] envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request field (400).
    #[error("{0}")]
    Validation(String),

    /// Missing credential on a protected operation (401).
    #[error("{0}")]
    Unauthorized(String),

    /// Referenced record does not exist (404).
    #[error("{0}")]
    NotFound(String),

    /// Injected transient failure (500). Carries a summary message.
    #[error("{error}")]
    Transient { message: String, error: String },

    /// Any other server-side fault (500).
    #[error("{0}")]
    Unexpected(String),
}

impl ApiError {
    /// HTTP status this error is reported with.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Transient { .. } | Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = match self {
            Self::Transient { message, error } => ErrorResponse::new(error).with_message(message),
            other => ErrorResponse::new(other.to_string()),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Validation("Token is required".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("API token required".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::NotFound("Token not found".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Transient {
                message: "Failed to connect to Binary Dollar".into(),
                error: "Connection failed".into(),
            }
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_transient_displays_error_field() {
        let err = ApiError::Transient {
            message: "Failed to connect to Binary Dollar".into(),
            error: "Connection failed".into(),
        };
        assert_eq!(err.to_string(), "Connection failed");
    }
}
