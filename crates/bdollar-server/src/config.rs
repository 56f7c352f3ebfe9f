//! Server configuration.
//!
//! Configuration is loaded from `~/.config/bdollar/server.toml` when present,
//! or from an explicit path. Every key is optional.
//!
//! ## Example Configuration
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:3000"
//! base_path = "/api/binary-dollar"
//!
//! [simulation]
//! connect_delay_ms = 1000
//! failure_probability = 0.1
//! seed = 42
//!
//! [store]
//! seed_demo_token = true
//! enforce_revocation = false
//! ```

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ServerError};
use crate::paths;

/// Server configuration loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listener settings
    #[serde(default)]
    pub server: HttpSettings,

    /// Simulated latency and failure injection for `/connect`
    #[serde(default)]
    pub simulation: SimulationSettings,

    /// Token store behavior
    #[serde(default)]
    pub store: StoreSettings,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Socket address to bind (default: 127.0.0.1:3000)
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Prefix every route is mounted under (default: /api/binary-dollar)
    #[serde(default = "default_base_path")]
    pub base_path: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            base_path: default_base_path(),
        }
    }
}

/// Simulated handshake settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Delay before `/connect` answers, in milliseconds (default: 1000)
    #[serde(default = "default_connect_delay_ms")]
    pub connect_delay_ms: u64,

    /// Probability that `/connect` fails after the delay (default: 0.1)
    #[serde(default = "default_failure_probability")]
    pub failure_probability: f64,

    /// Seed for deterministic secrets and failures. OS randomness when unset.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            connect_delay_ms: default_connect_delay_ms(),
            failure_probability: default_failure_probability(),
            seed: None,
        }
    }
}

/// Token store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Insert a "Demo Token" record at startup (default: true)
    #[serde(default = "default_true")]
    pub seed_demo_token: bool,

    /// Make revoke look the token up and deactivate it (default: false)
    #[serde(default)]
    pub enforce_revocation: bool,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            seed_demo_token: true,
            enforce_revocation: false,
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_base_path() -> String {
    "/api/binary-dollar".to_string()
}

const fn default_connect_delay_ms() -> u64 {
    1000
}

const fn default_failure_probability() -> f64 {
    0.1
}

const fn default_true() -> bool {
    true
}

impl ServerConfig {
    /// Loads configuration.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// read if present and built-in defaults are used otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An explicit file doesn't exist or cannot be read
    /// - Deserialization fails
    /// - Validation fails
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_path(path);
        }

        match Self::config_path() {
            Some(path) if path.exists() => Self::from_path(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Reads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, malformed, or invalid.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ServerError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("Failed to read config file: {e}")))?;

        let config: Self = toml::from_str(&contents)?;
        config.validate()?;

        Ok(config)
    }

    /// Returns the default configuration file path, if a config directory exists.
    pub fn config_path() -> Option<PathBuf> {
        paths::app_config_dir().map(|dir| dir.join("server.toml"))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The bind address does not parse
    /// - The base path is not empty and does not start with `/`, or ends with `/`
    /// - The failure probability is outside `[0, 1]`
    pub fn validate(&self) -> Result<()> {
        self.bind_addr()?;

        let base = &self.server.base_path;
        if !base.is_empty() && (!base.starts_with('/') || base.ends_with('/')) {
            return Err(ServerError::Config(format!(
                "Base path '{base}' must start with '/' and must not end with '/'"
            )));
        }

        let p = self.simulation.failure_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(ServerError::Config(format!(
                "Failure probability {p} must be between 0.0 and 1.0"
            )));
        }

        Ok(())
    }

    /// Parses the bind address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is not a valid `host:port` socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server.bind.parse().map_err(|e| {
            ServerError::Config(format!("Invalid bind address '{}': {e}", self.server.bind))
        })
    }

    /// Delay applied to every `/connect` handshake.
    pub const fn connect_delay(&self) -> Duration {
        Duration::from_millis(self.simulation.connect_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]

    use super::*;
    use std::io::Write;

    fn sample_config_toml() -> &'static str {
        r#"
[server]
bind = "0.0.0.0:8080"
base_path = "/api/v1"

[simulation]
connect_delay_ms = 250
failure_probability = 0.5
seed = 7

[store]
seed_demo_token = false
enforce_revocation = true
        "#
    }

    #[test]
    fn test_parse_config() {
        let config: ServerConfig = toml::from_str(sample_config_toml()).unwrap();

        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.server.base_path, "/api/v1");
        assert_eq!(config.connect_delay(), Duration::from_millis(250));
        assert!((config.simulation.failure_probability - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.simulation.seed, Some(7));
        assert!(!config.store.seed_demo_token);
        assert!(config.store.enforce_revocation);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_settings() {
        let config: ServerConfig = toml::from_str("").unwrap();

        assert_eq!(config.server.bind, "127.0.0.1:3000");
        assert_eq!(config.server.base_path, "/api/binary-dollar");
        assert_eq!(config.connect_delay(), Duration::from_secs(1));
        assert!((config.simulation.failure_probability - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.simulation.seed, None);
        assert!(config.store.seed_demo_token);
        assert!(!config.store.enforce_revocation);
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config: ServerConfig = toml::from_str("[simulation]\nseed = 3\n").unwrap();
        assert_eq!(config.simulation.connect_delay_ms, 1000);
        assert_eq!(config.simulation.seed, Some(3));
    }

    #[test]
    fn test_validate_failure_probability() {
        let config: ServerConfig =
            toml::from_str("[simulation]\nfailure_probability = 1.5\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_base_path() {
        for bad in ["api", "/api/", "/"] {
            let mut config = ServerConfig::default();
            config.server.base_path = bad.to_string();
            assert!(config.validate().is_err(), "{bad} should be rejected");
        }

        let mut config = ServerConfig::default();
        config.server.base_path = String::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bind_address() {
        let mut config = ServerConfig::default();
        config.server.bind = "not-an-address".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(sample_config_toml().as_bytes()).unwrap();

        let config = ServerConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.server.base_path, "/api/v1");
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = ServerConfig::load(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("Configuration file not found"));
    }
}
