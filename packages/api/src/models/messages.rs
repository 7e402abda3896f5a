//! Request and response bodies of the backend auth endpoints.
//!
//! Every reply carries a `status` flag. Replies are decoded whatever the HTTP
//! status code, so FastAPI error bodies (`{"detail": ...}`) land here too: a
//! missing `status` reads as `false` and `detail` stands in for `message`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::auth::AuthorizationCode;

/// Body of `POST /api/v1/auth/google/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub authorization_code: String,
}

impl From<AuthorizationCode> for LoginRequest {
    fn from(code: AuthorizationCode) -> Self {
        Self {
            authorization_code: code.into_secret(),
        }
    }
}

/// Reply of the login endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default, alias = "detail", deserialize_with = "message_text")]
    pub message: Option<String>,
    /// Kept as sent so it can be persisted verbatim; read it as a
    /// [`UserProfile`](super::UserProfile) to display it.
    #[serde(default)]
    pub user_info: Option<Value>,
    #[serde(default)]
    pub jwt_token: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
}

/// Body of `POST /api/v1/auth/verify-token`.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyTokenRequest {
    pub token: String,
}

/// Reply shape shared by the profile and verify-token endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserDataResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default, alias = "detail", deserialize_with = "message_text")]
    pub message: Option<String>,
    #[serde(default)]
    pub user_data: Option<Value>,
}

pub type ProfileResponse = UserDataResponse;
pub type VerifyTokenResponse = UserDataResponse;

// Any JSON value as text; FastAPI validation errors put a list in `detail`.
fn message_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    })
}
