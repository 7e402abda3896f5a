//! # Credential persistence on an abstract key/value store
//!
//! A signed-in session leaves three string values behind:
//!
//! | Key | Value |
//! |-----|-------|
//! | [`SESSION_TOKEN_KEY`] (`"jwt_token"`) | Session token issued by the backend |
//! | [`ACCESS_TOKEN_KEY`] (`"google_access_token"`) | Upstream Google access token |
//! | [`USER_INFO_KEY`] (`"user_info"`) | JSON-serialized user profile |
//!
//! [`CredentialStore`] writes the three together on login and removes them
//! together on logout. Nothing enforces that they stay in sync afterwards: a
//! profile without a token is a recoverable anomaly the caller can detect with
//! [`CredentialStore::is_partial`].
//!
//! The store never interprets the profile; parsing it is the caller's job, which
//! is also why [`CredentialStore::discard_user_info`] exists on its own.

use std::fmt;
use std::future::Future;

pub const SESSION_TOKEN_KEY: &str = "jwt_token";
pub const ACCESS_TOKEN_KEY: &str = "google_access_token";
pub const USER_INFO_KEY: &str = "user_info";

/// Every key a session writes, in write order.
pub const CREDENTIAL_KEYS: [&str; 3] = [SESSION_TOKEN_KEY, ACCESS_TOKEN_KEY, USER_INFO_KEY];

/// Async string key/value capability (browser storage, files, memory).
///
/// Implementations swallow their own I/O failures: a read that fails is a
/// missing value, a write that fails is logged and dropped.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> impl Future<Output = Option<String>>;
    fn set(&self, key: &str, value: &str) -> impl Future<Output = ()>;
    fn remove(&self, key: &str) -> impl Future<Output = ()>;
}

/// The three values persisted after a successful login.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub session_token: String,
    pub access_token: String,
    /// Profile record, already serialized to JSON.
    pub user_info: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("session_token", &"[redacted]")
            .field("access_token", &"[redacted]")
            .field("user_info", &self.user_info)
            .finish()
    }
}

/// Reads and writes [`Credentials`] on top of a [`KeyValueStore`].
#[derive(Clone, Debug, Default)]
pub struct CredentialStore<S> {
    store: S,
}

impl<S: KeyValueStore> CredentialStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Write all three values. Last write wins.
    pub async fn save(&self, credentials: &Credentials) {
        self.store
            .set(SESSION_TOKEN_KEY, &credentials.session_token)
            .await;
        self.store
            .set(ACCESS_TOKEN_KEY, &credentials.access_token)
            .await;
        self.store.set(USER_INFO_KEY, &credentials.user_info).await;
    }

    /// Remove all three values, whatever is currently stored.
    pub async fn clear(&self) {
        for key in CREDENTIAL_KEYS {
            self.store.remove(key).await;
        }
    }

    pub async fn session_token(&self) -> Option<String> {
        self.non_empty(SESSION_TOKEN_KEY).await
    }

    pub async fn access_token(&self) -> Option<String> {
        self.non_empty(ACCESS_TOKEN_KEY).await
    }

    pub async fn user_info(&self) -> Option<String> {
        self.non_empty(USER_INFO_KEY).await
    }

    /// Drop a profile value that could not be parsed.
    pub async fn discard_user_info(&self) {
        self.store.remove(USER_INFO_KEY).await;
    }

    /// All three values, or `None` if any of them is missing.
    pub async fn load(&self) -> Option<Credentials> {
        Some(Credentials {
            session_token: self.session_token().await?,
            access_token: self.access_token().await?,
            user_info: self.user_info().await?,
        })
    }

    /// True when some but not all credential keys are present.
    pub async fn is_partial(&self) -> bool {
        let mut present = 0;
        for key in CREDENTIAL_KEYS {
            if self.non_empty(key).await.is_some() {
                present += 1;
            }
        }
        present != 0 && present != CREDENTIAL_KEYS.len()
    }

    // Empty strings count as absent.
    async fn non_empty(&self, key: &str) -> Option<String> {
        self.store.get(key).await.filter(|value| !value.is_empty())
    }
}
