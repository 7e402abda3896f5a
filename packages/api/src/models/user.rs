//! # User profile of a signed-in account
//!
//! [`UserProfile`] is the record the backend relays from Google's userinfo
//! endpoint (`googleapis.com/oauth2/v2/userinfo`) in the `user_info` field of a
//! successful login. The record itself is persisted exactly as received under the
//! `user_info` storage key; this type is how the widget reads it back.
//!
//! Only the fields the widget renders are typed. Anything else Google returns
//! (`given_name`, `family_name`, `locale`, …) is kept in [`UserProfile::extra`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Profile of the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    /// Google's `verified_email`; `verified` is accepted when reading.
    #[serde(rename = "verified_email", alias = "verified", default)]
    pub verified: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Get display name, falling back to email if name is empty.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}
