//! # API crate: session logic for the Google sign-in widget
//!
//! Everything the widget does that is not rendering lives here, free of any UI
//! framework so it can be tested with an in-memory store and a scripted backend.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | [`Session`] state, the single-use [`AuthorizationCode`], and [`SessionClient`] with every widget operation |
//! | [`backend`] | [`BackendApi`] seam and the reqwest-based [`HttpBackend`] |
//! | [`models`] | [`UserProfile`] and the JSON bodies of the auth endpoints |
//! | [`error`] | [`ApiError`] for transport/decoding, [`SessionError`] for what the user sees |
//! | [`settings`] | Backend URL and Google client settings |
//!
//! ## Flow
//!
//! 1. The UI obtains an [`AuthorizationCode`] from Google's popup.
//! 2. [`SessionClient::login`] posts it to the backend and persists the returned
//!    session token, access token and profile.
//! 3. [`SessionClient::fetch_profile`] and [`SessionClient::verify_token`] read the
//!    stored token for authenticated calls.
//! 4. [`SessionClient::logout`] forgets all of it; [`SessionClient::rehydrate`]
//!    brings the profile back on the next mount.

pub mod auth;
pub mod backend;
pub mod error;
pub mod models;
pub mod settings;

pub use auth::{AuthorizationCode, Session, SessionCell, SessionClient, TokenVerdict};
pub use backend::{BackendApi, HttpBackend};
pub use error::{ApiError, Operation, SessionError};
pub use models::UserProfile;
pub use settings::Settings;
