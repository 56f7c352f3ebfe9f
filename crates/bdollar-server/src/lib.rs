//! # bdollar-server
//!
//! Demo HTTP service for managing Binary Dollar API tokens.
//!
//! Tokens live in an in-memory store owned by [`AppState`]; the connect
//! handshake is simulated with a configurable delay and failure rate.
//!
//! ## Endpoints
//!
//! All paths are relative to the configured base path
//! (default `/api/binary-dollar`):
//!
//! - `GET /connect` - Simulated handshake, requires an `Authorization` header
//! - `GET /status` - Static service health
//! - `GET /tokens` - List tokens with masked secrets
//! - `POST /tokens` - Create a token, returns the full secret once
//! - `POST /tokens/revoke` - Revoke a token

use std::sync::Arc;

use axum::Router;
use tracing::info;

pub mod config;
pub mod connection;
pub mod error;
pub mod fault;
pub mod generator;
pub mod handlers;
pub mod paths;
pub mod routes;
pub mod server;
pub mod store;
pub mod tokens;

use crate::config::ServerConfig;
use crate::connection::ConnectionService;
use crate::error::{Result, ServerError};
use crate::fault::{FaultInjector, RandomFaultInjector};
use crate::generator::{OsSecretGenerator, SecretGenerator, SeededSecretGenerator};
use crate::store::InMemoryTokenStore;
use crate::tokens::TokenService;

/// Shared application state handed to every handler.
pub struct AppState {
    pub tokens: TokenService,
    pub connection: ConnectionService,
}

impl AppState {
    pub const fn new(tokens: TokenService, connection: ConnectionService) -> Self {
        Self { tokens, connection }
    }

    /// Wires the store, generator, and fault injector described by `config`.
    ///
    /// With a `simulation.seed`, both secrets and handshake failures are
    /// reproducible across runs.
    ///
    /// # Errors
    ///
    /// Returns an error if the demo token cannot be seeded.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let sim = &config.simulation;

        let faults: Arc<dyn FaultInjector> = match sim.seed {
            Some(seed) => Arc::new(RandomFaultInjector::with_seed(
                config.connect_delay(),
                sim.failure_probability,
                seed,
            )),
            None => Arc::new(RandomFaultInjector::new(
                config.connect_delay(),
                sim.failure_probability,
            )),
        };

        Self::with_faults(config, secret_generator(config), faults)
    }

    /// Like [`AppState::from_config`] but with explicit generator and injector.
    ///
    /// # Errors
    ///
    /// Returns an error if the demo token cannot be seeded.
    pub fn with_faults(
        config: &ServerConfig,
        generator: Arc<dyn SecretGenerator>,
        faults: Arc<dyn FaultInjector>,
    ) -> Result<Self> {
        let tokens = TokenService::new(Arc::new(InMemoryTokenStore::new()), generator)
            .with_enforced_revocation(config.store.enforce_revocation);

        if config.store.seed_demo_token {
            let demo = tokens
                .seed_demo_token()
                .map_err(|e| ServerError::Config(format!("Failed to seed demo token: {e}")))?;
            info!(token_id = %demo.id, "Seeded demo token");
        }

        Ok(Self::new(tokens, ConnectionService::new(faults)))
    }
}

/// Secret generator for `config`: seeded when `simulation.seed` is set.
pub fn secret_generator(config: &ServerConfig) -> Arc<dyn SecretGenerator> {
    match config.simulation.seed {
        Some(seed) => Arc::new(SeededSecretGenerator::new(seed)),
        None => Arc::new(OsSecretGenerator),
    }
}

/// Builds the application router from configuration.
///
/// # Errors
///
/// Returns an error if the application state cannot be built.
pub fn build_app(config: &ServerConfig) -> Result<Router> {
    let state = Arc::new(AppState::from_config(config)?);
    Ok(routes::build_router(state, &config.server.base_path))
}
