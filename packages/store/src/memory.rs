use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::credentials::KeyValueStore;

/// In-memory KeyValueStore for testing and non-browser fallback.
///
/// Clones share the same map, so a test can keep a handle and inspect what a
/// [`crate::CredentialStore`] wrote.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every stored entry.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    async fn set(&self, key: &str, value: &str) {
        self.lock().insert(key.to_string(), value.to_string());
    }

    async fn remove(&self, key: &str) {
        self.lock().remove(key);
    }
}
