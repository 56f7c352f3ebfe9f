//! Token lifecycle: list, create, revoke.

use std::sync::Arc;

use bdollar_common::ApiToken;
use tracing::{debug, info, instrument, warn};

use crate::generator::SecretGenerator;
use crate::store::{StoreError, TokenStore};

/// Name given to the record inserted at startup.
pub const DEMO_TOKEN_NAME: &str = "Demo Token";

/// How many fresh secrets to try before giving up on a collision.
const MAX_ISSUE_ATTEMPTS: usize = 3;

/// Result of a revoke request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevokeOutcome {
    /// Acknowledged without consulting the store.
    Acknowledged,
    /// The record was found and is now inactive.
    Deactivated(ApiToken),
}

/// Token operations over a [`TokenStore`].
pub struct TokenService {
    store: Arc<dyn TokenStore>,
    generator: Arc<dyn SecretGenerator>,
    enforce_revocation: bool,
}

impl TokenService {
    /// Creates a service in reference mode: revoke never touches the store.
    pub fn new(store: Arc<dyn TokenStore>, generator: Arc<dyn SecretGenerator>) -> Self {
        Self {
            store,
            generator,
            enforce_revocation: false,
        }
    }

    /// Makes revoke look the secret up and deactivate the record.
    #[must_use]
    pub const fn with_enforced_revocation(mut self, enforce: bool) -> Self {
        self.enforce_revocation = enforce;
        self
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// Returns every record with its secret masked.
    pub fn list(&self) -> Vec<ApiToken> {
        self.store.list().iter().map(ApiToken::masked).collect()
    }

    /// Issues a new active token and returns it unmasked.
    ///
    /// The caller is responsible for validating `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] if every attempt collided with an
    /// existing secret or identifier.
    #[instrument(skip(self))]
    pub fn create(&self, name: &str) -> Result<ApiToken, StoreError> {
        let mut last_err = StoreError::Duplicate("no attempt made".to_string());

        for attempt in 1..=MAX_ISSUE_ATTEMPTS {
            let token = ApiToken::new(self.generator.id(), self.generator.secret(), name);
            match self.store.insert(token) {
                Ok(token) => {
                    info!(token_id = %token.id, "Issued API token");
                    return Ok(token);
                }
                Err(e) => {
                    warn!(attempt, error = %e, "Token collision, regenerating");
                    last_err = e;
                }
            }
        }

        Err(last_err)
    }

    /// Revokes a token.
    ///
    /// In reference mode this always acknowledges, whether or not the secret
    /// exists, and no record changes.
    ///
    /// # Errors
    ///
    /// With enforcement on, returns [`StoreError::NotFound`] for an unknown secret.
    #[instrument(skip_all)]
    pub fn revoke(&self, secret: &str) -> Result<RevokeOutcome, StoreError> {
        if !self.enforce_revocation {
            debug!("Revocation acknowledged without store lookup");
            return Ok(RevokeOutcome::Acknowledged);
        }

        let token = self.store.deactivate(secret)?;
        info!(token_id = %token.id, "Deactivated API token");
        Ok(RevokeOutcome::Deactivated(token))
    }

    /// Inserts the startup demo record.
    ///
    /// # Errors
    ///
    /// See [`TokenService::create`].
    pub fn seed_demo_token(&self) -> Result<ApiToken, StoreError> {
        self.create(DEMO_TOKEN_NAME)
    }
}
