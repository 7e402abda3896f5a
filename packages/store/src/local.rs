//! # Browser `localStorage` store
//!
//! [`LocalStore`] is the [`KeyValueStore`] used on the **web platform**. Values
//! are scoped to the page origin and survive reloads, which is what lets a
//! signed-in profile come back on the next visit.
//!
//! The Storage API is synchronous; the async trait methods simply complete
//! immediately. When storage is unavailable (private mode, disabled cookies) reads
//! return `None` and writes are logged and dropped.

use crate::credentials::KeyValueStore;

/// `window.localStorage`-backed KeyValueStore.
#[derive(Clone, Debug, Default)]
pub struct LocalStore;

impl LocalStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl KeyValueStore for LocalStore {
    async fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    async fn set(&self, key: &str, value: &str) {
        let Some(storage) = Self::storage() else {
            tracing::warn!("localStorage unavailable, dropping {}", key);
            return;
        };
        if let Err(e) = storage.set_item(key, value) {
            tracing::warn!("Failed to write {} to localStorage: {:?}", key, e);
        }
    }

    async fn remove(&self, key: &str) {
        let Some(storage) = Self::storage() else {
            return;
        };
        if let Err(e) = storage.remove_item(key) {
            tracing::warn!("Failed to remove {} from localStorage: {:?}", key, e);
        }
    }
}
