//! Error types for backend calls and session operations.

use thiserror::Error;

/// Failure talking to the backend: transport, decoding, or a reply missing a
/// field it promised.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("response is missing `{0}`")]
    MissingField(&'static str),
}

/// Widget operations that can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    Profile,
    VerifyToken,
}

impl Operation {
    /// Message shown when the backend could not be reached or answered garbage.
    pub fn network_message(self) -> &'static str {
        match self {
            Operation::Login => "Network error occurred during login",
            Operation::Profile => "Failed to call API",
            Operation::VerifyToken => "Failed to verify token",
        }
    }

    /// Message shown when no session token is stored.
    pub fn missing_token_message(self) -> &'static str {
        match self {
            Operation::Login => "No JWT token found",
            Operation::Profile => "No JWT token found. Please login first.",
            Operation::VerifyToken => "No JWT token found",
        }
    }

    /// Message used when the backend says no without saying why.
    pub fn rejected_fallback(self) -> &'static str {
        match self {
            Operation::Login => "Login failed",
            Operation::Profile => "API call failed",
            Operation::VerifyToken => "Token is invalid or expired",
        }
    }
}

/// Session-level failure. `Display` is the message the widget shows.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The OAuth popup reported an error; the reason is only logged.
    #[error("Google authentication failed")]
    OAuth(String),
    #[error("A login is already in progress")]
    LoginInFlight,
    /// The backend answered with a falsy `status`.
    #[error("{message}")]
    Rejected { op: Operation, message: String },
    #[error("{}", .op.network_message())]
    Network {
        op: Operation,
        #[source]
        source: ApiError,
    },
    #[error("{}", .op.missing_token_message())]
    MissingToken { op: Operation },
}

impl SessionError {
    pub(crate) fn rejected(op: Operation, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| op.rejected_fallback().to_string());
        SessionError::Rejected { op, message }
    }

    pub(crate) fn network(op: Operation) -> impl FnOnce(ApiError) -> Self {
        move |source| SessionError::Network { op, source }
    }
}
