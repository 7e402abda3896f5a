//! # Session operations
//!
//! [`SessionClient`] implements everything the sign-in widget does against its
//! two capabilities, a [`KeyValueStore`] for the persisted credentials and a
//! [`BackendApi`] for the auth backend. It holds no UI state: each operation
//! returns its outcome and the caller applies it to a [`crate::Session`].
//!
//! | Operation | Network | Storage |
//! |-----------|---------|---------|
//! | [`rehydrate`](SessionClient::rehydrate) | none | reads `user_info`, removes it if corrupt |
//! | [`login`](SessionClient::login) | login POST | writes all three keys on success |
//! | [`logout`](SessionClient::logout) | none | removes all three keys |
//! | [`fetch_profile`](SessionClient::fetch_profile) | profile GET | reads `jwt_token` |
//! | [`verify_token`](SessionClient::verify_token) | verify POST | reads `jwt_token` |
//!
//! [`sign_in`](SessionClient::sign_in), [`exchange`](SessionClient::exchange),
//! [`sign_out`](SessionClient::sign_out), [`protected_call`](SessionClient::protected_call)
//! and [`check_token`](SessionClient::check_token) run the same operations and
//! also apply their outcome to a [`SessionCell`].
//!
//! Nothing is retried. An operation that needs a token and finds none fails
//! before touching the network.

use serde_json::Value;
use store::{CredentialStore, Credentials, KeyValueStore};

use crate::auth::{AuthorizationCode, Session, SessionCell};
use crate::backend::BackendApi;
use crate::error::{ApiError, Operation, SessionError};
use crate::models::{LoginRequest, UserProfile, VerifyTokenRequest};

/// Result of asking the backend whether the stored token is still good.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenVerdict {
    /// Token accepted; carries the backend's `user_data`.
    Valid(Option<Value>),
    Invalid { message: String },
}

impl TokenVerdict {
    /// Acknowledgment shown to the user.
    pub fn acknowledgment(&self) -> &'static str {
        match self {
            TokenVerdict::Valid(_) => "Token is valid!",
            TokenVerdict::Invalid { .. } => "Token is invalid or expired",
        }
    }
}

/// Session operations over a credential store and a backend.
pub struct SessionClient<S, B> {
    credentials: CredentialStore<S>,
    backend: B,
}

impl<S: KeyValueStore, B: BackendApi> SessionClient<S, B> {
    pub fn new(store: S, backend: B) -> Self {
        Self {
            credentials: CredentialStore::new(store),
            backend,
        }
    }

    pub fn credentials(&self) -> &CredentialStore<S> {
        &self.credentials
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Restore the profile persisted by an earlier login.
    ///
    /// A stored value that does not parse is removed. A profile stored without
    /// a session token is still returned; that anomaly is only logged.
    pub async fn rehydrate(&self) -> Option<UserProfile> {
        let raw = self.credentials.user_info().await?;
        match serde_json::from_str::<UserProfile>(&raw) {
            Ok(user) => {
                if self.credentials.is_partial().await {
                    tracing::warn!("Stored profile found without a complete set of credentials");
                }
                tracing::debug!("Restored session for {}", user.email);
                Some(user)
            }
            // Also covers valid JSON that is not a profile object, such as `null`.
            Err(e) => {
                tracing::warn!("Error parsing stored user info, discarding it: {}", e);
                self.credentials.discard_user_info().await;
                None
            }
        }
    }

    /// Exchange an authorization code for a session and persist it.
    pub async fn login(&self, code: AuthorizationCode) -> Result<UserProfile, SessionError> {
        let request = LoginRequest::from(code);
        let response = self
            .backend
            .login(&request)
            .await
            .map_err(SessionError::network(Operation::Login))?;

        if !response.status {
            tracing::warn!("Login failed: {:?}", response.message);
            return Err(SessionError::rejected(Operation::Login, response.message));
        }

        let record = response
            .user_info
            .ok_or(ApiError::MissingField("user_info"))
            .map_err(SessionError::network(Operation::Login))?;
        let user = serde_json::from_value::<UserProfile>(record.clone())
            .map_err(ApiError::from)
            .map_err(SessionError::network(Operation::Login))?;
        let session_token = response
            .jwt_token
            .ok_or(ApiError::MissingField("jwt_token"))
            .map_err(SessionError::network(Operation::Login))?;
        let access_token = response
            .access_token
            .ok_or(ApiError::MissingField("access_token"))
            .map_err(SessionError::network(Operation::Login))?;
        // Persisted as received, not as re-serialized by `UserProfile`.
        let user_info = record.to_string();

        self.credentials
            .save(&Credentials {
                session_token,
                access_token,
                user_info,
            })
            .await;

        tracing::info!("Login successful for {}", user.email);
        Ok(user)
    }

    /// Forget the session locally. The backend is not told.
    pub async fn logout(&self) {
        self.credentials.clear().await;
        tracing::info!("Logged out");
    }

    /// Call the protected profile endpoint with the stored token.
    pub async fn fetch_profile(&self) -> Result<Option<Value>, SessionError> {
        let op = Operation::Profile;
        let token = self
            .credentials
            .session_token()
            .await
            .ok_or(SessionError::MissingToken { op })?;

        let response = self
            .backend
            .profile(&token)
            .await
            .map_err(SessionError::network(op))?;

        if !response.status {
            tracing::warn!("API call failed: {:?}", response.message);
            return Err(SessionError::rejected(op, response.message));
        }
        tracing::debug!("Profile data: {:?}", response.user_data);
        Ok(response.user_data)
    }

    /// Ask the backend whether the stored token is still valid.
    pub async fn verify_token(&self) -> Result<TokenVerdict, SessionError> {
        let op = Operation::VerifyToken;
        let token = self
            .credentials
            .session_token()
            .await
            .ok_or(SessionError::MissingToken { op })?;

        let response = self
            .backend
            .verify_token(&VerifyTokenRequest { token })
            .await
            .map_err(SessionError::network(op))?;

        if response.status {
            tracing::debug!("Token data: {:?}", response.user_data);
            Ok(TokenVerdict::Valid(response.user_data))
        } else {
            let message = response
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| op.rejected_fallback().to_string());
            tracing::warn!("Token rejected: {}", message);
            Ok(TokenVerdict::Invalid { message })
        }
    }

    /// Finish the sign-in flow with whatever the OAuth popup produced.
    pub async fn sign_in(
        &self,
        session: &mut impl SessionCell,
        outcome: Result<AuthorizationCode, String>,
    ) -> Result<UserProfile, SessionError> {
        match outcome {
            Ok(code) => self.exchange(session, code).await,
            Err(reason) => {
                tracing::error!("Google login error: {}", reason);
                session.update(|s| s.oauth_failed(reason.clone()));
                Err(SessionError::OAuth(reason))
            }
        }
    }

    /// [`login`](Self::login) tracked on `session`. While an exchange is in
    /// flight another one is refused before any request is sent, and `loading`
    /// stays set for the first.
    pub async fn exchange(
        &self,
        session: &mut impl SessionCell,
        code: AuthorizationCode,
    ) -> Result<UserProfile, SessionError> {
        if let Err(e) = session.update(Session::begin_login) {
            tracing::warn!("Ignoring authorization code: {}", e);
            session.update(|s| s.fail(&e));
            return Err(e);
        }

        let result = self.login(code).await;
        session.update(|s| s.finish_login(&result));
        result
    }

    pub async fn sign_out(&self, session: &mut impl SessionCell) {
        self.logout().await;
        session.update(Session::logged_out);
    }

    /// [`fetch_profile`](Self::fetch_profile), with a failure shown on `session`.
    pub async fn protected_call(
        &self,
        session: &mut impl SessionCell,
    ) -> Result<Option<Value>, SessionError> {
        let result = self.fetch_profile().await;
        if let Err(e) = &result {
            session.update(|s| s.fail(e));
        }
        result
    }

    /// [`verify_token`](Self::verify_token), with the verdict or failure shown
    /// on `session`.
    pub async fn check_token(
        &self,
        session: &mut impl SessionCell,
    ) -> Result<TokenVerdict, SessionError> {
        let result = self.verify_token().await;
        match &result {
            Ok(verdict) => session.update(|s| s.record_verdict(verdict)),
            Err(e) => session.update(|s| s.fail(e)),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    use serde::de::DeserializeOwned;
    use store::{MemoryStore, ACCESS_TOKEN_KEY, SESSION_TOKEN_KEY, USER_INFO_KEY};

    use crate::models::{LoginResponse, ProfileResponse, VerifyTokenResponse};

    const ANN_LOGIN: &str = r#"{
        "status": true,
        "user_info": {"name": "Ann", "email": "a@x.com", "verified_email": true},
        "jwt_token": "T1",
        "access_token": "A1"
    }"#;

    /// Backend that answers every call with a scripted JSON body.
    #[derive(Default)]
    struct ScriptedBackend {
        body: &'static str,
        /// Yield once before answering a login, as a real request would.
        pausing: bool,
        calls: Cell<usize>,
        last_token: RefCell<Option<String>>,
        last_code: RefCell<Option<String>>,
    }

    impl ScriptedBackend {
        fn answering(body: &'static str) -> Self {
            Self {
                body,
                ..Self::default()
            }
        }

        fn pausing(body: &'static str) -> Self {
            Self {
                body,
                pausing: true,
                ..Self::default()
            }
        }

        fn reply<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
            self.calls.set(self.calls.get() + 1);
            Ok(serde_json::from_str(self.body)?)
        }
    }

    impl BackendApi for ScriptedBackend {
        async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
            *self.last_code.borrow_mut() = Some(request.authorization_code.clone());
            if self.pausing {
                tokio::task::yield_now().await;
            }
            self.reply()
        }

        async fn profile(&self, token: &str) -> Result<ProfileResponse, ApiError> {
            *self.last_token.borrow_mut() = Some(token.to_string());
            self.reply()
        }

        async fn verify_token(
            &self,
            request: &VerifyTokenRequest,
        ) -> Result<VerifyTokenResponse, ApiError> {
            *self.last_token.borrow_mut() = Some(request.token.clone());
            self.reply()
        }
    }

    fn client(
        memory: &MemoryStore,
        body: &'static str,
    ) -> SessionClient<MemoryStore, ScriptedBackend> {
        SessionClient::new(memory.clone(), ScriptedBackend::answering(body))
    }

    async fn signed_in(memory: &MemoryStore) {
        client(memory, ANN_LOGIN)
            .login(AuthorizationCode::new("code"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_login_persists_credentials() {
        let memory = MemoryStore::new();
        let client = client(&memory, ANN_LOGIN);

        let user = client.login(AuthorizationCode::new("4/0Ab")).await.unwrap();

        assert_eq!(user.name, "Ann");
        assert_eq!(client.backend().last_code.borrow().as_deref(), Some("4/0Ab"));

        let entries = memory.snapshot();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[SESSION_TOKEN_KEY], "T1");
        assert_eq!(entries[ACCESS_TOKEN_KEY], "A1");
        let stored: UserProfile = serde_json::from_str(&entries[USER_INFO_KEY]).unwrap();
        assert_eq!(stored, user);

        let mut session = Session::default();
        session.begin_login().unwrap();
        session.finish_login(&Ok(user));
        let shown = session.user.unwrap();
        assert_eq!(format!("Welcome, {}!", shown.display_name()), "Welcome, Ann!");
    }

    #[tokio::test]
    async fn test_rejected_login_leaves_storage_untouched() {
        let memory = MemoryStore::new();
        memory.set("unrelated", "kept").await;
        let client = client(&memory, r#"{"status": false, "message": "Invalid code"}"#);

        let err = client.login(AuthorizationCode::new("bad")).await.unwrap_err();

        assert!(matches!(err, SessionError::Rejected { .. }));
        assert_eq!(err.to_string(), "Invalid code");
        assert_eq!(memory.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_login_parse_failure_is_network_error() {
        let memory = MemoryStore::new();
        let client = client(&memory, "<html>502</html>");

        let err = client.login(AuthorizationCode::new("code")).await.unwrap_err();

        assert_eq!(err.to_string(), "Network error occurred during login");
        assert!(memory.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_login_reply_without_token_persists_nothing() {
        let memory = MemoryStore::new();
        let client = client(
            &memory,
            r#"{"status": true, "user_info": {"name": "Ann", "email": "a@x.com"}, "access_token": "A1"}"#,
        );

        let err = client.login(AuthorizationCode::new("code")).await.unwrap_err();

        assert!(matches!(
            err,
            SessionError::Network {
                source: ApiError::MissingField("jwt_token"),
                ..
            }
        ));
        assert!(memory.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_logout_removes_all_keys() {
        let memory = MemoryStore::new();
        signed_in(&memory).await;
        let client = client(&memory, "{}");

        client.logout().await;

        assert!(memory.snapshot().is_empty());
        assert_eq!(client.backend().calls.get(), 0);
        assert!(client.rehydrate().await.is_none());

        // Logging out twice is harmless
        client.logout().await;
        assert!(memory.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_profile_without_token_skips_network() {
        let memory = MemoryStore::new();
        let client = client(&memory, r#"{"status": true}"#);

        let err = client.fetch_profile().await.unwrap_err();

        assert_eq!(err.to_string(), "No JWT token found. Please login first.");
        assert_eq!(client.backend().calls.get(), 0);
    }

    #[tokio::test]
    async fn test_verify_without_token_skips_network() {
        let memory = MemoryStore::new();
        let client = client(&memory, r#"{"status": true}"#);

        let err = client.verify_token().await.unwrap_err();

        assert_eq!(err.to_string(), "No JWT token found");
        assert_eq!(client.backend().calls.get(), 0);
    }

    #[tokio::test]
    async fn test_profile_uses_stored_token() {
        let memory = MemoryStore::new();
        signed_in(&memory).await;
        let client = client(&memory, r#"{"status": true, "user_data": {"email": "a@x.com"}}"#);

        let data = client.fetch_profile().await.unwrap();

        assert_eq!(data.unwrap()["email"], "a@x.com");
        assert_eq!(client.backend().last_token.borrow().as_deref(), Some("T1"));
    }

    #[tokio::test]
    async fn test_profile_rejection_and_network_failure() {
        let memory = MemoryStore::new();
        signed_in(&memory).await;

        let rejected = client(&memory, r#"{"status": false, "message": "Token expired"}"#);
        let err = rejected.fetch_profile().await.unwrap_err();
        assert_eq!(err.to_string(), "Token expired");

        let broken = client(&memory, "not json");
        let err = broken.fetch_profile().await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to call API");

        // Failures never touch the stored session
        assert_eq!(memory.snapshot().len(), 3);
    }

    #[tokio::test]
    async fn test_verify_expired_token() {
        let memory = MemoryStore::new();
        signed_in(&memory).await;
        let client = client(&memory, r#"{"status": false, "message": "expired"}"#);

        let verdict = client.verify_token().await.unwrap();

        assert_eq!(
            verdict,
            TokenVerdict::Invalid {
                message: "expired".to_string()
            }
        );
        assert_eq!(verdict.acknowledgment(), "Token is invalid or expired");
        assert_eq!(client.backend().last_token.borrow().as_deref(), Some("T1"));

        let mut session = Session::default();
        session.record_verdict(&verdict);
        assert_eq!(session.error.as_deref(), Some("expired"));
    }

    #[tokio::test]
    async fn test_verify_valid_token_and_network_failure() {
        let memory = MemoryStore::new();
        signed_in(&memory).await;

        let valid = client(&memory, r#"{"status": true, "user_data": {"user_id": "1042"}}"#);
        let verdict = valid.verify_token().await.unwrap();
        assert_eq!(verdict.acknowledgment(), "Token is valid!");

        let broken = client(&memory, "");
        let err = broken.verify_token().await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to verify token");
    }

    #[tokio::test]
    async fn test_rehydrate_restores_profile_without_network() {
        let memory = MemoryStore::new();
        signed_in(&memory).await;
        let client = client(&memory, "{}");

        let user = client.rehydrate().await.unwrap();

        assert_eq!(user.name, "Ann");
        assert!(user.verified);
        assert_eq!(client.backend().calls.get(), 0);
    }

    #[tokio::test]
    async fn test_rehydrate_discards_corrupt_profile() {
        let memory = MemoryStore::new();
        memory.set(SESSION_TOKEN_KEY, "T1").await;
        memory.set(USER_INFO_KEY, "{not json").await;
        let client = client(&memory, "{}");

        assert!(client.rehydrate().await.is_none());

        let entries = memory.snapshot();
        assert!(!entries.contains_key(USER_INFO_KEY));
        assert_eq!(entries[SESSION_TOKEN_KEY], "T1");
    }

    #[tokio::test]
    async fn test_rehydrate_keeps_profile_without_token() {
        let memory = MemoryStore::new();
        memory
            .set(USER_INFO_KEY, r#"{"name":"Ann","email":"a@x.com"}"#)
            .await;
        let client = client(&memory, "{}");

        let user = client.rehydrate().await.unwrap();

        assert_eq!(user.display_name(), "Ann");
        assert!(memory.snapshot().contains_key(USER_INFO_KEY));
    }

    #[tokio::test]
    async fn test_rehydrate_with_empty_storage() {
        let memory = MemoryStore::new();
        let client = client(&memory, "{}");
        assert!(client.rehydrate().await.is_none());
    }

    impl SessionCell for &RefCell<Session> {
        fn update<R>(&mut self, f: impl FnOnce(&mut Session) -> R) -> R {
            f(&mut *self.borrow_mut())
        }
    }

    #[tokio::test]
    async fn test_login_stores_user_info_as_received() {
        let memory = MemoryStore::new();
        let client = client(
            &memory,
            r#"{
                "status": true,
                "user_info": {"id": null, "email": "a@x.com", "picture": null, "hd": "x.com"},
                "jwt_token": "T1",
                "access_token": "A1"
            }"#,
        );

        let user = client.login(AuthorizationCode::new("code")).await.unwrap();
        assert_eq!(user.display_name(), "a@x.com");

        let stored: Value = serde_json::from_str(&memory.snapshot()[USER_INFO_KEY]).unwrap();
        assert_eq!(
            stored,
            serde_json::json!({"id": null, "email": "a@x.com", "picture": null, "hd": "x.com"})
        );
        assert_eq!(client.rehydrate().await, Some(user));
    }

    #[tokio::test]
    async fn test_login_with_non_object_user_info_is_network_error() {
        let memory = MemoryStore::new();
        let client = client(
            &memory,
            r#"{"status": true, "user_info": "Ann", "jwt_token": "T1", "access_token": "A1"}"#,
        );

        let err = client.login(AuthorizationCode::new("code")).await.unwrap_err();

        assert_eq!(err.to_string(), "Network error occurred during login");
        assert!(memory.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_rehydrate_discards_non_profile_json() {
        let memory = MemoryStore::new();
        memory.set(USER_INFO_KEY, "null").await;
        let client = client(&memory, "{}");

        assert!(client.rehydrate().await.is_none());
        assert!(!memory.snapshot().contains_key(USER_INFO_KEY));
    }

    async fn attempt(
        client: &SessionClient<MemoryStore, ScriptedBackend>,
        shared: &RefCell<Session>,
        code: &str,
    ) -> (Result<UserProfile, SessionError>, Session) {
        let mut cell = shared;
        let result = client.exchange(&mut cell, AuthorizationCode::new(code)).await;
        let seen = shared.borrow().clone();
        (result, seen)
    }

    #[tokio::test]
    async fn test_overlapping_exchange_sends_one_request() {
        let memory = MemoryStore::new();
        let client = SessionClient::new(memory.clone(), ScriptedBackend::pausing(ANN_LOGIN));
        let shared = RefCell::new(Session::default());

        let (first, second) = tokio::join!(
            attempt(&client, &shared, "c1"),
            attempt(&client, &shared, "c2"),
        );

        assert_eq!(client.backend().calls.get(), 1);
        let (accepted, refused) = if first.0.is_ok() {
            (first, second)
        } else {
            (second, first)
        };

        // The refused exchange returns while the other is still waiting
        assert!(matches!(refused.0, Err(SessionError::LoginInFlight)));
        assert!(refused.1.loading);
        assert_eq!(
            refused.1.error.as_deref(),
            Some("A login is already in progress")
        );

        assert_eq!(accepted.0.unwrap().name, "Ann");
        let settled = shared.into_inner();
        assert!(!settled.loading);
        assert!(settled.error.is_none());
        assert_eq!(settled.user.unwrap().name, "Ann");
        assert_eq!(memory.snapshot().len(), 3);
    }

    #[tokio::test]
    async fn test_exchange_refused_while_loading() {
        let memory = MemoryStore::new();
        let client = client(&memory, ANN_LOGIN);
        let mut session = Session::default();
        session.begin_login().unwrap();

        let err = client
            .exchange(&mut session, AuthorizationCode::new("late"))
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::LoginInFlight));
        assert_eq!(client.backend().calls.get(), 0);
        assert!(session.loading);
        assert_eq!(session.error.as_deref(), Some("A login is already in progress"));
        assert!(memory.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_sign_in_with_oauth_error() {
        let memory = MemoryStore::new();
        let client = client(&memory, ANN_LOGIN);
        let mut session = Session::default();

        let err = client
            .sign_in(&mut session, Err("popup_closed".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::OAuth(_)));
        assert!(!session.loading);
        assert_eq!(session.error.as_deref(), Some("Google authentication failed"));
        assert_eq!(client.backend().calls.get(), 0);
    }

    #[tokio::test]
    async fn test_sign_in_then_sign_out() {
        let memory = MemoryStore::new();
        let client = client(&memory, ANN_LOGIN);
        let mut session = Session {
            error: Some("Failed to call API".to_string()),
            ..Session::default()
        };

        client
            .sign_in(&mut session, Ok(AuthorizationCode::new("code")))
            .await
            .unwrap();
        assert!(!session.loading);
        assert!(session.error.is_none());
        assert_eq!(session.user.as_ref().unwrap().display_name(), "Ann");

        client.sign_out(&mut session).await;
        assert_eq!(session, Session::default());
        assert!(memory.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_exchange_shows_backend_message() {
        let memory = MemoryStore::new();
        let client = client(&memory, r#"{"status": false}"#);
        let mut session = Session::default();

        let err = client
            .exchange(&mut session, AuthorizationCode::new("bad"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Login failed");
        assert!(!session.loading);
        assert_eq!(session.error.as_deref(), Some("Login failed"));
    }

    #[tokio::test]
    async fn test_protected_call_without_token_sets_error() {
        let memory = MemoryStore::new();
        let client = client(&memory, r#"{"status": true}"#);
        let mut session = Session::default();

        assert!(client.protected_call(&mut session).await.is_err());

        assert_eq!(
            session.error.as_deref(),
            Some("No JWT token found. Please login first.")
        );
        assert_eq!(client.backend().calls.get(), 0);
    }

    #[tokio::test]
    async fn test_check_token_applies_verdict() {
        let memory = MemoryStore::new();
        signed_in(&memory).await;
        let mut session = Session::default();

        let expired = client(&memory, r#"{"status": false, "message": "expired"}"#);
        let verdict = expired.check_token(&mut session).await.unwrap();
        assert_eq!(verdict.acknowledgment(), "Token is invalid or expired");
        assert_eq!(session.error.as_deref(), Some("expired"));

        let broken = client(&memory, "<html>");
        assert!(broken.check_token(&mut session).await.is_err());
        assert_eq!(session.error.as_deref(), Some("Failed to verify token"));
        // Credentials survive an invalid or unverifiable token
        assert_eq!(memory.snapshot().len(), 3);
    }
}
