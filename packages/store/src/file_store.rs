//! # Filesystem-backed key/value store
//!
//! [`FileStore`] persists each key as a small file under a base directory. It is
//! the native stand-in for browser `localStorage`, so credentials survive app
//! restarts outside the browser.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! ├── jwt_token
//! ├── google_access_token
//! └── user_info
//! ```
//!
//! Use [`dirs::data_dir()`](https://docs.rs/dirs) to pick a platform-appropriate
//! base, e.g. `~/.local/share/google-session/` on Linux.

use std::path::PathBuf;

use crate::credentials::KeyValueStore;

/// Filesystem-backed KeyValueStore for native builds.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.base.join(key)
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.entry_path(key)).ok()
    }

    async fn set(&self, key: &str, value: &str) {
        if let Err(e) = std::fs::create_dir_all(&self.base) {
            tracing::warn!("Failed to create {}: {}", self.base.display(), e);
            return;
        }
        if let Err(e) = std::fs::write(self.entry_path(key), value) {
            tracing::warn!("Failed to persist {}: {}", key, e);
        }
    }

    async fn remove(&self, key: &str) {
        let path = self.entry_path(key);
        if path.exists() {
            if let Err(e) = std::fs::remove_file(&path) {
                tracing::warn!("Failed to remove {}: {}", key, e);
            }
        }
    }
}
