//! # Backend API client
//!
//! [`BackendApi`] is the seam between the session logic and the HTTP backend that
//! performs the real token exchange. [`HttpBackend`] implements it with
//! `reqwest`, which compiles to `fetch` in the browser.
//!
//! | Call | Endpoint |
//! |------|----------|
//! | [`login`](BackendApi::login) | `POST /api/v1/auth/google/login` with `{authorization_code}` |
//! | [`profile`](BackendApi::profile) | `GET /api/v1/auth/profile` with `Authorization: Bearer <token>` |
//! | [`verify_token`](BackendApi::verify_token) | `POST /api/v1/auth/verify-token` with `{token}` |
//!
//! Replies are decoded regardless of their HTTP status; the JSON `status` flag is
//! what decides success. Only transport and decoding problems become
//! [`ApiError`]s.

use std::future::Future;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::models::{
    LoginRequest, LoginResponse, ProfileResponse, VerifyTokenRequest, VerifyTokenResponse,
};
use crate::settings::Settings;

pub const LOGIN_PATH: &str = "/api/v1/auth/google/login";
pub const PROFILE_PATH: &str = "/api/v1/auth/profile";
pub const VERIFY_TOKEN_PATH: &str = "/api/v1/auth/verify-token";

/// Async interface to the auth backend.
pub trait BackendApi {
    fn login(
        &self,
        request: &LoginRequest,
    ) -> impl Future<Output = Result<LoginResponse, ApiError>>;
    fn profile(&self, token: &str) -> impl Future<Output = Result<ProfileResponse, ApiError>>;
    fn verify_token(
        &self,
        request: &VerifyTokenRequest,
    ) -> impl Future<Output = Result<VerifyTokenResponse, ApiError>>;
}

/// reqwest-backed BackendApi.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.backend.base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        tracing::debug!("Backend answered {}", status);
    }
    Ok(serde_json::from_str(&body)?)
}

impl BackendApi for HttpBackend {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let response = self
            .http
            .post(self.url(LOGIN_PATH))
            .json(request)
            .send()
            .await?;
        decode(response).await
    }

    async fn profile(&self, token: &str) -> Result<ProfileResponse, ApiError> {
        let response = self
            .http
            .get(self.url(PROFILE_PATH))
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {}", token))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;
        decode(response).await
    }

    async fn verify_token(
        &self,
        request: &VerifyTokenRequest,
    ) -> Result<VerifyTokenResponse, ApiError> {
        let response = self
            .http
            .post(self.url(VERIFY_TOKEN_PATH))
            .json(request)
            .send()
            .await?;
        decode(response).await
    }
}
