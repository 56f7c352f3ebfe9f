//! # bdollar-client
//!
//! Client library for the Binary Dollar token API.
//!
//! The crate provides:
//! - the [`BinaryDollarApi`] trait over the six API operations
//! - [`BinaryDollarClient`], the reqwest implementation
//! - [`ConnectionManager`], which tracks connection state for a UI
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use bdollar_client::{BinaryDollarClient, ClientConfig, ConnectionManager};
//!
//! # async fn example() -> Result<(), bdollar_client::ClientError> {
//! let client = Arc::new(BinaryDollarClient::new(ClientConfig::default())?);
//! let manager = ConnectionManager::new(client);
//!
//! manager.connect(Some("bd_my_credential")).await?;
//! assert!(manager.state().is_connected);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;

use bdollar_common::{
    ConnectResponse, CreateTokenResponse, ListTokensResponse, RevokeTokenResponse,
    StatusResponse,
};

pub mod client;
pub mod config;
pub mod connection;
pub mod error;

pub use client::BinaryDollarClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use connection::{ConnectionManager, ConnectionState};
pub use error::ClientError;

/// Operations exposed by the Binary Dollar token API.
///
/// Implementations must be thread-safe so one handle can be shared between
/// the connection manager and the token manager.
#[async_trait]
pub trait BinaryDollarApi: Send + Sync {
    /// Replaces the bearer credential used by subsequent requests.
    ///
    /// An empty string clears it.
    fn set_api_token(&self, token: &str);

    /// Authenticated handshake (`GET /connect`).
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status, which
    /// includes the 401 sent when no credential is set.
    async fn connect(&self) -> Result<ConnectResponse, ClientError>;

    /// Service health (`GET /status`).
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    async fn status(&self) -> Result<StatusResponse, ClientError>;

    /// Lists all tokens with their secrets masked (`GET /tokens`).
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    async fn list_tokens(&self) -> Result<ListTokensResponse, ClientError>;

    /// Issues a new token (`POST /tokens`).
    ///
    /// The returned record carries the full secret. It is the only time the
    /// secret is ever returned.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    async fn create_token(&self, name: &str) -> Result<CreateTokenResponse, ClientError>;

    /// Revokes a token by its secret (`POST /tokens/revoke`).
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    async fn revoke_token(&self, token: &str) -> Result<RevokeTokenResponse, ClientError>;
}
