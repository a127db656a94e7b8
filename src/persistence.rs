//! Key-value persistence collaborator.
//!
//! The session snapshot survives restarts ([`StorageScope::Durable`]); the
//! visited-view tabs only live as long as the browser session
//! ([`StorageScope::Session`]). Values are JSON strings so any string store
//! (local storage, a file, a database row) can back the trait.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// Lifetime of a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageScope {
    /// Cleared when the client session ends.
    Session,
    /// Kept across restarts.
    Durable,
}

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("stored value for '{key}' is not valid: {source}")]
    Serde {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// String key-value store with two scopes.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, scope: StorageScope, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, scope: StorageScope, key: &str, value: String) -> Result<(), StoreError>;

    fn remove(&self, scope: StorageScope, key: &str) -> Result<(), StoreError>;
}

/// Read and deserialize a JSON value.
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    scope: StorageScope,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(scope, key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Serde {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Serialize and write a JSON value.
pub fn save_json<T: Serialize>(
    store: &dyn KeyValueStore,
    scope: StorageScope,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Serde {
        key: key.to_string(),
        source,
    })?;
    store.set(scope, key, raw)
}

/// In-process store, useful for tests and headless embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<(StorageScope, String), String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every value of one scope, as ending a browser session would.
    pub fn clear_scope(&self, scope: StorageScope) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(s, _), _| *s != scope);
    }

    pub fn len(&self) -> usize {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, scope: StorageScope, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(scope, key.to_string()))
            .cloned())
    }

    fn set(&self, scope: StorageScope, key: &str, value: String) -> Result<(), StoreError> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((scope, key.to_string()), value);
        Ok(())
    }

    fn remove(&self, scope: StorageScope, key: &str) -> Result<(), StoreError> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&(scope, key.to_string()));
        Ok(())
    }
}
