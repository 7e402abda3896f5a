//! Client-side persistence for the session credentials.
//!
//! Everything goes through the [`KeyValueStore`] capability so the same
//! [`CredentialStore`] logic runs against browser `localStorage`, a directory on
//! disk, or an in-memory map in tests.

pub mod credentials;

mod memory;
pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
mod file_store;
#[cfg(not(target_arch = "wasm32"))]
pub use file_store::FileStore;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod local;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use local::LocalStore;

pub use credentials::{
    CredentialStore, Credentials, KeyValueStore, ACCESS_TOKEN_KEY, CREDENTIAL_KEYS,
    SESSION_TOKEN_KEY, USER_INFO_KEY,
};
