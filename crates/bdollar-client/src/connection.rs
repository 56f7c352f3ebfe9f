//! Connection state tracking for interactive front ends.
//!
//! [`ConnectionManager`] owns a [`ConnectionState`] and publishes every
//! transition through a `tokio::sync::watch` channel. Overlapping calls are
//! not serialized; whichever attempt finishes last decides the final state.

use std::sync::Arc;

use bdollar_common::ConnectResponse;
use log::{debug, warn};
use tokio::sync::watch;

use crate::BinaryDollarApi;
use crate::error::ClientError;

/// Snapshot of the connection to the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionState {
    pub is_connecting: bool,
    pub is_connected: bool,
    pub error: Option<String>,
    /// Failed attempts so far. Never reset.
    pub retry_count: u32,
    /// Last credential that connected successfully, or the one set explicitly.
    pub api_token: String,
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self {
            is_connecting: true,
            is_connected: false,
            error: None,
            retry_count: 0,
            api_token: String::new(),
        }
    }
}

/// Drives connection attempts against a [`BinaryDollarApi`].
pub struct ConnectionManager<A: BinaryDollarApi + ?Sized> {
    api: Arc<A>,
    state: watch::Sender<ConnectionState>,
}

impl<A: BinaryDollarApi + ?Sized> std::fmt::Debug for ConnectionManager<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ConnectionManager")
            .field("is_connecting", &state.is_connecting)
            .field("is_connected", &state.is_connected)
            .field("error", &state.error)
            .field("retry_count", &state.retry_count)
            .finish_non_exhaustive()
    }
}

impl<A: BinaryDollarApi + ?Sized> ConnectionManager<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            state: watch::Sender::new(ConnectionState::default()),
        }
    }

    /// Starts with a stored credential, as if [`set_api_token`](Self::set_api_token)
    /// had been called.
    #[must_use]
    pub fn with_api_token(self, token: &str) -> Self {
        self.set_api_token(token);
        self
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    /// Current state.
    pub fn state(&self) -> ConnectionState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state transition.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    /// Stores the credential and hands it to the client without connecting.
    pub fn set_api_token(&self, token: &str) {
        self.api.set_api_token(token);
        self.state.send_modify(|state| state.api_token = token.to_string());
    }

    /// Attempts a handshake.
    ///
    /// Uses `token` when it is non-empty, otherwise the stored credential. A
    /// 2xx reply carrying `success: false` counts as a failure.
    ///
    /// # Errors
    ///
    /// Returns the failure that was also recorded in the state.
    pub async fn connect(&self, token: Option<&str>) -> Result<ConnectResponse, ClientError> {
        let current = match token {
            Some(token) if !token.is_empty() => token.to_string(),
            _ => self.state.borrow().api_token.clone(),
        };

        self.state.send_modify(|state| {
            state.is_connecting = true;
            state.error = None;
        });

        if !current.is_empty() {
            self.api.set_api_token(&current);
        }

        let result = match self.api.connect().await {
            Ok(response) if response.success => Ok(response),
            Ok(response) => Err(ClientError::Rejected(response.message)),
            Err(e) => Err(e),
        };

        match &result {
            Ok(response) => {
                debug!("Connected as {}", response.authenticated_as);
                self.state.send_modify(|state| {
                    state.is_connected = true;
                    state.is_connecting = false;
                    state.error = None;
                    state.api_token = current;
                });
            }
            Err(e) => {
                warn!("Connection attempt failed: {e}");
                self.state.send_modify(|state| {
                    state.is_connected = false;
                    state.is_connecting = false;
                    state.error = Some(e.to_string());
                    state.retry_count = state.retry_count.saturating_add(1);
                });
            }
        }

        result
    }

    /// Reconnects with the stored credential.
    ///
    /// # Errors
    ///
    /// Same as [`connect`](Self::connect).
    pub async fn retry(&self) -> Result<ConnectResponse, ClientError> {
        self.connect(None).await
    }

    /// Initial attempt when a front end starts.
    ///
    /// Connects when a credential is stored, otherwise just leaves the
    /// connecting state. The outcome is available through [`state`](Self::state).
    pub async fn mount(&self) {
        let has_token = !self.state.borrow().api_token.is_empty();
        if has_token {
            // Failure is already recorded in the state.
            let _ = self.connect(None).await;
        } else {
            self.state.send_modify(|state| state.is_connecting = false);
        }
    }
}
