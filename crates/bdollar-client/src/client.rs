//! HTTP client for the Binary Dollar token API.
//!
//! # Examples
//!
//! ```no_run
//! use bdollar_client::{BinaryDollarApi, BinaryDollarClient, ClientConfig};
//!
//! # async fn example() -> Result<(), bdollar_client::ClientError> {
//! let client = BinaryDollarClient::new(
//!     ClientConfig::new("http://127.0.0.1:3000/api/binary-dollar"),
//! )?;
//!
//! let created = client.create_token("CI Token").await?;
//! println!("Copy it now: {}", created.token.token);
//!
//! client.set_api_token(&created.token.token);
//! let handshake = client.connect().await?;
//! println!("{}", handshake.message);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use bdollar_common::{
    ConnectResponse, CreateTokenRequest, CreateTokenResponse, ListTokensResponse,
    RevokeTokenRequest, RevokeTokenResponse, StatusResponse,
};
use log::{debug, error, warn};
use parking_lot::RwLock;
use reqwest::{Method, header};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::BinaryDollarApi;
use crate::config::ClientConfig;
use crate::error::ClientError;

/// Client for the Binary Dollar token API.
///
/// The credential sits behind a lock so it can be replaced through a shared
/// handle; every later request picks up the new value.
///
/// # Security
///
/// The API token is stored using the `secrecy` crate and redacted from
/// `Debug` output.
pub struct BinaryDollarClient {
    http: reqwest::Client,
    base_url: String,
    api_token: RwLock<Option<SecretString>>,
}

impl std::fmt::Debug for BinaryDollarClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinaryDollarClient")
            .field("base_url", &self.base_url)
            .field(
                "api_token",
                &self.api_token.read().as_ref().map(|_| "[REDACTED]"),
            )
            .finish_non_exhaustive()
    }
}

impl BinaryDollarClient {
    /// Creates a client from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be built.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        url::Url::parse(&base_url).map_err(|e| {
            ClientError::ConfigurationError(format!("Invalid base URL '{base_url}': {e}"))
        })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::ConfigurationError(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            api_token: RwLock::new(config.api_token),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether a credential is currently attached to requests.
    pub fn has_api_token(&self) -> bool {
        self.api_token.read().is_some()
    }

    /// Sends a request and decodes the JSON success body.
    async fn make_request<B, T>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<T, ClientError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{endpoint}", self.base_url);

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = self.api_token.read().as_ref() {
            request = request.bearer_auth(token.expose_secret());
        }

        if let Some(body) = body {
            request = request.body(serde_json::to_vec(body)?);
        }

        debug!("{method} {url}");

        let response = request.send().await.map_err(|e| {
            warn!("Request to {url} failed before a response arrived: {e}");
            ClientError::from(e)
        })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let err = ClientError::from_response(status, &text);
            error!(
                "API request failed with status {}: {err}",
                status.as_u16()
            );
            return Err(err);
        }

        serde_json::from_str(&text).map_err(|e| {
            debug!(
                "Unexpected response body: {}",
                text.chars().take(500).collect::<String>()
            );
            ClientError::InvalidResponse(e.to_string())
        })
    }
}

/// Server text for a `success: false` envelope: `error`, else `message`.
fn rejection_message(body: &serde_json::Value) -> String {
    ["error", "message"]
        .iter()
        .filter_map(|field| body.get(field).and_then(serde_json::Value::as_str))
        .find(|text| !text.is_empty())
        .unwrap_or("Connection rejected")
        .to_string()
}

#[async_trait]
impl BinaryDollarApi for BinaryDollarClient {
    fn set_api_token(&self, token: &str) {
        *self.api_token.write() =
            (!token.is_empty()).then(|| SecretString::new(token.into()));
    }

    async fn connect(&self) -> Result<ConnectResponse, ClientError> {
        let body: serde_json::Value = self
            .make_request::<(), _>(Method::GET, "/connect", None)
            .await?;

        // A refused handshake only carries `error` and/or `message`.
        if body.get("success").and_then(serde_json::Value::as_bool) == Some(false) {
            return Err(ClientError::Rejected(rejection_message(&body)));
        }

        serde_json::from_value(body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    async fn status(&self) -> Result<StatusResponse, ClientError> {
        self.make_request::<(), _>(Method::GET, "/status", None)
            .await
    }

    async fn list_tokens(&self) -> Result<ListTokensResponse, ClientError> {
        self.make_request::<(), _>(Method::GET, "/tokens", None)
            .await
    }

    async fn create_token(&self, name: &str) -> Result<CreateTokenResponse, ClientError> {
        let body = CreateTokenRequest {
            name: name.to_string(),
        };
        self.make_request(Method::POST, "/tokens", Some(&body))
            .await
    }

    async fn revoke_token(&self, token: &str) -> Result<RevokeTokenResponse, ClientError> {
        let body = RevokeTokenRequest {
            token: token.to_string(),
        };
        self.make_request(Method::POST, "/tokens/revoke", Some(&body))
            .await
    }
}
