//! Transient widget state.

use crate::auth::client::TokenVerdict;
use crate::error::SessionError;
use crate::models::UserProfile;

/// Where the widget keeps its [`Session`].
///
/// [`crate::SessionClient`] holds on to one across an exchange and updates it
/// only between awaits, so a UI signal works as well as a plain value.
pub trait SessionCell {
    fn update<R>(&mut self, f: impl FnOnce(&mut Session) -> R) -> R;
}

impl SessionCell for Session {
    fn update<R>(&mut self, f: impl FnOnce(&mut Session) -> R) -> R {
        f(self)
    }
}

/// What the widget shows: the signed-in profile, whether a login exchange is in
/// flight, and the last error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub user: Option<UserProfile>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Session {
    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// Mark a login exchange as started. Rejects a second one while the first
    /// is still in flight.
    pub fn begin_login(&mut self) -> Result<(), SessionError> {
        if self.loading {
            return Err(SessionError::LoginInFlight);
        }
        self.loading = true;
        self.error = None;
        Ok(())
    }

    /// Apply the outcome of a login exchange. A failed login keeps whatever
    /// profile was shown before.
    pub fn finish_login(&mut self, result: &Result<UserProfile, SessionError>) {
        match result {
            Ok(user) => {
                self.user = Some(user.clone());
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
        self.loading = false;
    }

    /// The OAuth popup failed before any code was issued.
    pub fn oauth_failed(&mut self, reason: impl Into<String>) {
        self.error = Some(SessionError::OAuth(reason.into()).to_string());
        self.loading = false;
    }

    /// Surface an operation error without touching the rest of the state.
    pub fn fail(&mut self, error: &SessionError) {
        self.error = Some(error.to_string());
    }

    pub fn record_verdict(&mut self, verdict: &TokenVerdict) {
        if let TokenVerdict::Invalid { message } = verdict {
            self.error = Some(message.clone());
        }
    }

    pub fn logged_out(&mut self) {
        self.user = None;
        self.error = None;
    }
}
