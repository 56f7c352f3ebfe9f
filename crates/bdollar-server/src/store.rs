//! Token storage.
//!
//! The store is an explicitly owned object built once at startup and shared
//! with the request handlers through [`AppState`](crate::AppState). Records
//! live for the lifetime of the process; nothing is persisted.

use bdollar_common::ApiToken;
use indexmap::IndexMap;
use parking_lot::RwLock;
use thiserror::Error;

/// Errors raised by a [`TokenStore`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A record with the same secret or identifier already exists.
    #[error("Duplicate token record: {0}")]
    Duplicate(String),

    /// No record matches the given secret.
    #[error("Token not found")]
    NotFound,
}

/// Repository interface for token records.
///
/// Implementations keep records in insertion order and enforce that both the
/// secret and the identifier are unique.
pub trait TokenStore: Send + Sync {
    /// Returns every record, unmasked, in insertion order.
    fn list(&self) -> Vec<ApiToken>;

    /// Looks a record up by its secret.
    fn find(&self, secret: &str) -> Option<ApiToken>;

    /// Inserts a new record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] if the secret or identifier is taken.
    fn insert(&self, token: ApiToken) -> Result<ApiToken, StoreError>;

    /// Marks a record revoked and returns it. Already revoked records stay revoked.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record has this secret.
    fn deactivate(&self, secret: &str) -> Result<ApiToken, StoreError>;

    /// Number of stored records.
    fn len(&self) -> usize;

    /// Whether the store holds no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-local store keyed by secret.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    tokens: RwLock<IndexMap<String, ApiToken>>,
}

impl InMemoryTokenStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for InMemoryTokenStore {
    fn list(&self) -> Vec<ApiToken> {
        self.tokens.read().values().cloned().collect()
    }

    fn find(&self, secret: &str) -> Option<ApiToken> {
        self.tokens.read().get(secret).cloned()
    }

    fn insert(&self, token: ApiToken) -> Result<ApiToken, StoreError> {
        let mut tokens = self.tokens.write();

        if tokens.contains_key(&token.token) {
            return Err(StoreError::Duplicate("secret already issued".to_string()));
        }
        if tokens.values().any(|t| t.id == token.id) {
            return Err(StoreError::Duplicate(format!("id {}", token.id)));
        }

        tokens.insert(token.token.clone(), token.clone());
        Ok(token)
    }

    fn deactivate(&self, secret: &str) -> Result<ApiToken, StoreError> {
        let mut tokens = self.tokens.write();
        let token = tokens.get_mut(secret).ok_or(StoreError::NotFound)?;
        token.revoke();
        Ok(token.clone())
    }

    fn len(&self) -> usize {
        self.tokens.read().len()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use uuid::Uuid;

    fn token(secret: &str, name: &str) -> ApiToken {
        ApiToken::new(Uuid::new_v4(), secret, name)
    }

    #[test]
    fn test_insert_and_list_preserves_order() {
        let store = InMemoryTokenStore::new();
        assert!(store.is_empty());

        store.insert(token("bd_b", "second")).unwrap();
        store.insert(token("bd_a", "first")).unwrap();
        store.insert(token("bd_c", "third")).unwrap();

        let names: Vec<_> = store.list().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["second", "first", "third"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_duplicate_secret_rejected() {
        let store = InMemoryTokenStore::new();
        store.insert(token("bd_same", "one")).unwrap();

        let err = store.insert(token("bd_same", "two")).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.find("bd_same").unwrap().name, "one");
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let store = InMemoryTokenStore::new();
        let first = token("bd_one", "one");
        let mut second = token("bd_two", "two");
        second.id = first.id;

        store.insert(first).unwrap();
        assert!(matches!(
            store.insert(second),
            Err(StoreError::Duplicate(_))
        ));
    }

    #[test]
    fn test_deactivate_is_terminal() {
        let store = InMemoryTokenStore::new();
        store.insert(token("bd_live", "live")).unwrap();

        let revoked = store.deactivate("bd_live").unwrap();
        assert!(!revoked.is_active);

        let again = store.deactivate("bd_live").unwrap();
        assert!(!again.is_active);
        assert!(!store.find("bd_live").unwrap().is_active);
    }

    #[test]
    fn test_deactivate_unknown() {
        let store = InMemoryTokenStore::new();
        assert_eq!(store.deactivate("bd_missing"), Err(StoreError::NotFound));
    }
}
