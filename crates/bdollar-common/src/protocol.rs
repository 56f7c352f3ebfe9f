//! Wire envelopes for the Binary Dollar HTTP surface.
//!
//! Every success body carries `success: true`; every failure body is an
//! [`ErrorResponse`] with `success: false` and a human-readable `error`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::token::ApiToken;

/// Where the data in a response came from.
///
/// A `fallback` source tells the console it is looking at a non-primary data
/// source. The reference server never sets it; intermediaries may.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Primary,
    Fallback,
}

/// `GET /tokens` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTokensResponse {
    pub success: bool,
    /// Every record, secrets masked.
    pub tokens: Vec<ApiToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<DataSource>,
}

/// `POST /tokens` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTokenRequest {
    pub name: String,
}

/// `POST /tokens` response. The only place the full secret is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTokenResponse {
    pub success: bool,
    pub message: String,
    pub token: ApiToken,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<DataSource>,
}

/// `POST /tokens/revoke` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokeTokenRequest {
    pub token: String,
}

/// `POST /tokens/revoke` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokeTokenResponse {
    pub success: bool,
    pub message: String,
}

/// `GET /connect` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub server_status: String,
    pub authenticated_as: String,
}

/// Per-subsystem health reported by `GET /status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub database: String,
    pub api: String,
    pub cdn: String,
}

impl ServiceHealth {
    /// Every subsystem reported online.
    pub fn all_online() -> Self {
        Self {
            database: "online".to_string(),
            api: "online".to_string(),
            cdn: "online".to_string(),
        }
    }
}

/// `GET /status` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub service: String,
    pub version: String,
    pub status: String,
    pub uptime: String,
    pub last_check: DateTime<Utc>,
    /// Whether the caller presented a credential. Never validated.
    pub authenticated: bool,
    pub user: Option<String>,
    pub services: ServiceHealth,
}

/// Error envelope returned with every non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `false`.
    pub success: bool,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    /// Builds an envelope carrying only an error string.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            message: None,
        }
    }

    /// Attaches a summary message alongside the error.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_response_shape() {
        let body = serde_json::to_value(ErrorResponse::new("API token required")).unwrap();
        assert_eq!(body, json!({"success": false, "error": "API token required"}));

        let body = serde_json::to_value(
            ErrorResponse::new("Connection failed")
                .with_message("Failed to connect to Binary Dollar"),
        )
        .unwrap();
        assert_eq!(body["message"], "Failed to connect to Binary Dollar");
    }

    #[test]
    fn test_list_response_source_is_optional() {
        let parsed: ListTokensResponse =
            serde_json::from_value(json!({"success": true, "tokens": []})).unwrap();
        assert_eq!(parsed.source, None);

        let parsed: ListTokensResponse = serde_json::from_value(
            json!({"success": true, "tokens": [], "source": "fallback"}),
        )
        .unwrap();
        assert_eq!(parsed.source, Some(DataSource::Fallback));

        let body = serde_json::to_value(ListTokensResponse {
            success: true,
            tokens: Vec::new(),
            source: None,
        })
        .unwrap();
        assert!(body.get("source").is_none());
    }

    #[test]
    fn test_status_response_camel_case() {
        let status = StatusResponse {
            service: "Binary Dollar".to_string(),
            version: "1.0.0".to_string(),
            status: "operational".to_string(),
            uptime: "99.9%".to_string(),
            last_check: Utc::now(),
            authenticated: false,
            user: None,
            services: ServiceHealth::all_online(),
        };

        let body = serde_json::to_value(status).unwrap();
        assert!(body["lastCheck"].is_string());
        assert!(body["user"].is_null());
        assert_eq!(body["services"]["cdn"], "online");
    }

    #[test]
    fn test_connect_response_camel_case() {
        let body = json!({
            "success": true,
            "message": "Connected to Binary Dollar server successfully",
            "timestamp": "2025-03-01T12:00:00.000Z",
            "serverStatus": "online",
            "authenticatedAs": "Demo User"
        });

        let parsed: ConnectResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.server_status, "online");
        assert_eq!(parsed.authenticated_as, "Demo User");
    }
}
