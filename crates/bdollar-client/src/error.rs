//! Error types for the client library.

use serde::Deserialize;
use thiserror::Error;

/// Error envelope returned by the API.
///
/// Only the `error` string is read; anything else in the body is ignored.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
}

/// Errors that can occur when calling the Binary Dollar API.
///
/// The `Display` form of every variant is the human-readable message the
/// console shows verbatim.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// Transport-level failure.
    ///
    /// DNS resolution, refused connections, and other failures before an
    /// HTTP response arrived.
    #[error("Network error: Unable to connect to Binary Dollar API")]
    NetworkError(#[source] reqwest::Error),

    /// The API answered with a non-success status.
    ///
    /// `message` is the server-provided `error` string when there is one,
    /// otherwise `API request failed: <code> <reason>`.
    #[error("{message}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Message to surface to the user.
        message: String,
    },

    /// The API answered 2xx but reported `success: false`.
    #[error("{0}")]
    Rejected(String),

    /// Request exceeded the configured transport timeout.
    #[error("Timeout error")]
    TimeoutError,

    /// Response body did not match the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// JSON serialization error while building a request.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Client configuration issue.
    ///
    /// Invalid base URL or an HTTP client that cannot be built.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl ClientError {
    /// Builds an [`ClientError::ApiError`] from a failed response body.
    pub fn from_response(status: reqwest::StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|parsed| parsed.error)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| {
                format!(
                    "API request failed: {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                )
            });

        Self::ApiError {
            status: status.as_u16(),
            message,
        }
    }

    /// HTTP status code, if the server answered.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if this is a transport failure rather than an application error.
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::NetworkError(_) | Self::TimeoutError)
    }

    /// Check if this is an authentication error (HTTP 401).
    pub const fn is_authentication_error(&self) -> bool {
        matches!(self, Self::ApiError { status: 401, .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::TimeoutError
        } else {
            Self::NetworkError(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_response_prefers_server_message() {
        let err = ClientError::from_response(
            StatusCode::UNAUTHORIZED,
            r#"{"success":false,"error":"API token required"}"#,
        );
        assert_eq!(err.to_string(), "API token required");
        assert_eq!(err.status(), Some(401));
        assert!(err.is_authentication_error());
        assert!(!err.is_network_error());
    }

    #[test]
    fn test_from_response_falls_back_to_status() {
        let err = ClientError::from_response(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert_eq!(err.to_string(), "API request failed: 502 Bad Gateway");

        let err = ClientError::from_response(StatusCode::NOT_FOUND, r#"{"success":false}"#);
        assert_eq!(err.to_string(), "API request failed: 404 Not Found");

        let err = ClientError::from_response(StatusCode::BAD_REQUEST, r#"{"error":""}"#);
        assert_eq!(err.to_string(), "API request failed: 400 Bad Request");
    }

    #[test]
    fn test_rejected_displays_message() {
        let err = ClientError::Rejected("Handshake refused".to_string());
        assert_eq!(err.to_string(), "Handshake refused");
        assert_eq!(err.status(), None);
    }
}
