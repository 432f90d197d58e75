use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

/// Error raised when persisting or deleting a credential fails.
///
/// Failures are always reported to the caller; the store never swallows
/// them. Whether a failed save is fatal to a login attempt is the caller's
/// decision.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreError(pub String);

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential store error: {}", self.0)
    }
}

impl std::error::Error for StoreError {}

/// Fixed key under which the access token is persisted.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Durable key/value persistence for the access credential.
///
/// Implementations must be safe to call from arbitrary concurrent callers:
/// a single consistent value, last-writer-wins. This crate does not persist
/// anything itself; the application provides the storage backend (and the
/// transport only ever reads through this contract to attach the bearer
/// header).
pub trait TokenStore: Send + Sync {
    /// Stores `token` under `key`, replacing any previous value.
    fn save(&self, key: &str, token: &str) -> Result<(), StoreError>;

    /// Returns the stored token, or `None` when absent.
    fn get(&self, key: &str) -> Option<String>;

    /// Removes the stored token. Removing an absent value is not an error.
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory token store for tests and non-persistent embeddings.
#[derive(Default)]
pub struct MemoryTokenStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn save(&self, key: &str, token: &str) -> Result<(), StoreError> {
        let mut values = self
            .values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        values.insert(key.to_string(), token.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Option<String> {
        let values = self
            .values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        values.get(key).cloned()
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self
            .values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_get_roundtrip() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.get(ACCESS_TOKEN_KEY), None);

        store.save(ACCESS_TOKEN_KEY, "tok-1").unwrap();
        assert_eq!(store.get(ACCESS_TOKEN_KEY).as_deref(), Some("tok-1"));

        // Last writer wins
        store.save(ACCESS_TOKEN_KEY, "tok-2").unwrap();
        assert_eq!(store.get(ACCESS_TOKEN_KEY).as_deref(), Some("tok-2"));
    }

    #[test]
    fn test_delete_removes_value() {
        let store = MemoryTokenStore::new();
        store.save(ACCESS_TOKEN_KEY, "tok").unwrap();
        store.delete(ACCESS_TOKEN_KEY).unwrap();
        assert_eq!(store.get(ACCESS_TOKEN_KEY), None);

        // Deleting an absent value is fine
        store.delete(ACCESS_TOKEN_KEY).unwrap();
    }
}
