//! Key-value preference storage contracts and adapters.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Failures surfaced by a [`PrefsStore`] or the typed helpers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backing store rejected the operation.
    #[error("store backend failed: {0}")]
    Backend(String),
    /// The stored text is not valid JSON for the requested type.
    #[error("stored value for `{key}` is malformed: {message}")]
    Malformed {
        /// Preference key.
        key: String,
        /// Decoder message.
        message: String,
    },
    /// The value could not be encoded.
    #[error("could not encode value for `{key}`: {message}")]
    Encode {
        /// Preference key.
        key: String,
        /// Encoder message.
        message: String,
    },
}

/// Host service for persisted session values (JSON stored as text per key).
///
/// Each call is synchronous and atomic from the caller's point of view.
pub trait PrefsStore {
    /// Loads the raw JSON text for a key.
    fn load_pref(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Saves raw JSON text for a key.
    fn save_pref(&self, key: &str, raw_json: &str) -> Result<(), StoreError>;

    /// Deletes a key.
    fn delete_pref(&self, key: &str) -> Result<(), StoreError>;
}

/// Store that remembers nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPrefsStore;

impl PrefsStore for NoopPrefsStore {
    fn load_pref(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn save_pref(&self, _key: &str, _raw_json: &str) -> Result<(), StoreError> {
        Ok(())
    }

    fn delete_pref(&self, _key: &str) -> Result<(), StoreError> {
        Ok(())
    }
}

/// In-memory store keyed by string; clones share contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryPrefsStore {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryPrefsStore {
    /// Returns the stored keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = self.inner.borrow().keys().cloned().collect::<Vec<_>>();
        keys.sort();
        keys
    }
}

impl PrefsStore for MemoryPrefsStore {
    fn load_pref(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.inner.borrow().get(key).cloned())
    }

    fn save_pref(&self, key: &str, raw_json: &str) -> Result<(), StoreError> {
        self.inner
            .borrow_mut()
            .insert(key.to_string(), raw_json.to_string());
        Ok(())
    }

    fn delete_pref(&self, key: &str) -> Result<(), StoreError> {
        self.inner.borrow_mut().remove(key);
        Ok(())
    }
}

/// Loads and deserializes a typed value through a [`PrefsStore`].
///
/// # Errors
///
/// Returns an error when the store fails or the stored JSON does not decode as `T`.
pub fn load_pref_with<S: PrefsStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, StoreError> {
    let Some(raw) = store.load_pref(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|err| StoreError::Malformed {
            key: key.to_string(),
            message: err.to_string(),
        })
}

/// Serializes and saves a typed value through a [`PrefsStore`].
///
/// # Errors
///
/// Returns an error when encoding or the store save fails.
pub fn save_pref_with<S: PrefsStore + ?Sized, T: Serialize + ?Sized>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value).map_err(|err| StoreError::Encode {
        key: key.to_string(),
        message: err.to_string(),
    })?;
    store.save_pref(key, &raw)
}
