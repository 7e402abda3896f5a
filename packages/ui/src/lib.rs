//! This crate contains the shared UI of the Google sign-in demo.

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_brands_icons::FaGoogle;
}

mod platform;
pub use platform::{make_client, make_store, PlatformClient, PlatformStore};

mod oauth;
pub use oauth::{GoogleCodeClient, GOOGLE_IDENTITY_SCRIPT};

mod auth;
pub use auth::{
    check_token, sign_in, sign_out, test_protected_call, use_session,
    use_session_context, LoginButton, LogoutButton, SessionContext, SessionProvider,
};

pub mod activity_log;
pub use activity_log::{log_activity, use_activity_log, ActivityLog, LogLevel};

mod activity_log_panel;
pub use activity_log_panel::{ActivityLogPanel, ActivityLogToggle, LatestNotice};

mod widget;
pub use widget::SessionWidget;
