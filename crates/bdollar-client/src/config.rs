//! Client configuration.

use std::time::Duration;

use secrecy::SecretString;

/// Default API location: the bundled server on its default port.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000/api/binary-dollar";

/// Configuration for [`BinaryDollarClient`](crate::BinaryDollarClient).
///
/// The API token uses `SecretString` so it never shows up in debug output.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to.
    pub base_url: String,

    /// Initial bearer credential.
    pub api_token: Option<SecretString>,

    /// Transport timeout. None leaves it to the HTTP stack.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: None,
            timeout: None,
        }
    }

    /// Sets the initial bearer credential. An empty value leaves it unset.
    #[must_use]
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        let token: String = token.into();
        self.api_token = (!token.is_empty()).then(|| SecretString::new(token.into()));
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
