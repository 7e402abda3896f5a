//! Platform wiring for the session client.
//!
//! Picks the [`store::KeyValueStore`] that backs the credentials:
//! - **Web** (WASM + `web` feature): `window.localStorage` via [`store::LocalStore`]
//! - **Native**: one file per key under `<data_dir>/google-session/` via [`store::FileStore`]
//! - **WASM without `web`**: [`store::MemoryStore`], nothing survives a reload

use api::{HttpBackend, SessionClient, Settings};

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub type PlatformStore = store::LocalStore;
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformStore = store::FileStore;
#[cfg(all(target_arch = "wasm32", not(feature = "web")))]
pub type PlatformStore = store::MemoryStore;

/// Session client used by the widget on this platform.
pub type PlatformClient = SessionClient<PlatformStore, HttpBackend>;

/// Create the platform-appropriate credential store.
pub fn make_store() -> PlatformStore {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        store::LocalStore::new()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let base = dirs::data_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join("google-session");
        store::FileStore::new(base)
    }
    #[cfg(all(target_arch = "wasm32", not(feature = "web")))]
    {
        store::MemoryStore::new()
    }
}

/// Create the session client for the configured backend.
pub fn make_client(settings: &Settings) -> PlatformClient {
    SessionClient::new(make_store(), HttpBackend::from_settings(settings))
}
