//! API token records.
//!
//! A token record pairs an opaque bearer secret with a display name and an
//! activity flag. The secret is only ever shown in full once, at creation;
//! every listing carries the [masked](mask_secret) form instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed tag every generated secret starts with.
pub const TOKEN_PREFIX: &str = "bd_";

/// Number of leading characters kept visible by [`mask_secret`].
const MASK_HEAD: usize = 8;

/// Number of trailing characters kept visible by [`mask_secret`].
const MASK_TAIL: usize = 4;

/// A single API token record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiToken {
    /// Opaque unique identifier assigned by the server.
    pub id: Uuid,

    /// The bearer secret, or its masked form when listed.
    pub token: String,

    /// Free-text display name.
    pub name: String,

    /// When the record was created.
    pub created_at: DateTime<Utc>,

    /// When the token was last presented, if ever tracked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,

    /// Whether the token is active. Revocation is terminal.
    pub is_active: bool,
}

impl ApiToken {
    /// Creates a new active record stamped with the current time.
    pub fn new(id: Uuid, token: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            token: token.into(),
            name: name.into(),
            created_at: Utc::now(),
            last_used: None,
            is_active: true,
        }
    }

    /// Returns a copy of this record with the secret replaced by its masked form.
    #[must_use]
    pub fn masked(&self) -> Self {
        Self {
            token: mask_secret(&self.token),
            ..self.clone()
        }
    }

    /// Marks the record revoked. Calling this on a revoked record is a no-op.
    pub const fn revoke(&mut self) {
        self.is_active = false;
    }
}

/// Masks a secret for display: first 8 characters, `...`, last 4 characters.
///
/// Works on characters rather than bytes. Secrets shorter than 12 characters
/// yield overlapping slices, the head clamping to the whole string and the
/// tail clamping to the whole string when it has fewer than 4 characters.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    let head: String = chars.iter().take(MASK_HEAD).collect();
    let tail: String = chars[chars.len().saturating_sub(MASK_TAIL)..]
        .iter()
        .collect();
    format!("{head}...{tail}")
}
