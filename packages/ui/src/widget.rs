//! The sign-in widget: error banner, login button or profile card with its
//! actions, and a short explanation of the flow.

use api::{Session, UserProfile};
use dioxus::prelude::*;

use crate::activity_log::use_activity_log;
use crate::activity_log_panel::{ActivityLogPanel, ActivityLogToggle, LatestNotice};
use crate::auth::{
    check_token, test_protected_call, use_session, use_session_context, LoginButton,
    LogoutButton,
};

const HOW_IT_WORKS: [&str; 7] = [
    "Click \"Sign in with Google\" button",
    "Complete Google OAuth flow",
    "Authorization code is sent to the backend",
    "Backend exchanges code for tokens and user info",
    "JWT token is generated and returned",
    "JWT token is stored in localStorage",
    "Use JWT token for protected API calls",
];

/// Self-contained Google sign-in demo. Must be rendered inside a
/// [`crate::SessionProvider`].
#[component]
pub fn SessionWidget() -> Element {
    let session = use_session();
    let Session { user, error, .. } = session();

    let body = match user {
        None => rsx! {
            div {
                p { "Please login with your Google account:" }
                LoginButton { class: "session-btn google-btn" }
            }
        },
        Some(user) => rsx! {
            ProfileCard { user: user }
            SessionActions {}
        },
    };

    rsx! {
        div {
            class: "session-widget",
            h2 { "Google Authentication Demo" }

            if let Some(error) = error {
                div {
                    class: "session-error",
                    "Error: {error}"
                }
            }

            LatestNotice {}

            {body}

            HowItWorks {}

            div {
                class: "session-activity",
                ActivityLogToggle {}
                ActivityLogPanel {}
            }
        }

        style { {WIDGET_CSS} }
    }
}

#[component]
fn ProfileCard(user: UserProfile) -> Element {
    let verified = if user.verified { "✅" } else { "❌" };

    rsx! {
        div {
            class: "session-profile",
            h3 { "Welcome, {user.display_name()}!" }
            div {
                class: "session-profile-body",
                if let Some(picture) = user.picture.clone() {
                    img {
                        class: "session-avatar",
                        src: "{picture}",
                        alt: "Profile",
                    }
                }
                div {
                    p { strong { "Email:" } " {user.email}" }
                    p { strong { "Verified:" } " {verified}" }
                }
            }
        }
    }
}

#[component]
fn SessionActions() -> Element {
    let session = use_session();
    let log = use_activity_log();
    let context = use_session_context();
    let profile_context = context.clone();

    rsx! {
        div {
            class: "session-actions",
            button {
                class: "session-btn test-btn",
                onclick: move |_| test_protected_call(profile_context.clone(), session, log),
                "Test API Call"
            }
            button {
                class: "session-btn check-btn",
                onclick: move |_| check_token(context.clone(), session, log),
                "Check Token"
            }
            LogoutButton { class: "session-btn logout-btn" }
        }
    }
}

#[component]
fn HowItWorks() -> Element {
    rsx! {
        div {
            class: "session-help",
            h4 { "How it works:" }
            ol {
                for step in HOW_IT_WORKS {
                    li { "{step}" }
                }
            }
        }
    }
}

const WIDGET_CSS: &str = r#"
.session-widget {
    padding: 20px;
    max-width: 600px;
    margin: 0 auto;
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
}

.session-error {
    background: #ffe6e6;
    color: #d8000c;
    padding: 10px;
    margin-bottom: 20px;
    border-radius: 4px;
}

.session-notice {
    background: #e6f4ea;
    color: #1e7e34;
    padding: 10px;
    margin-bottom: 20px;
    border-radius: 4px;
}

.session-notice.warning {
    background: #fff4e5;
    color: #8a5300;
}

.session-btn {
    padding: 10px 20px;
    color: white;
    border: none;
    border-radius: 4px;
    cursor: pointer;
    margin-right: 10px;
    font-size: 0.9375rem;
}

.session-btn:disabled {
    opacity: 0.5;
    cursor: not-allowed;
}

.google-btn { background-color: #4285f4; padding: 12px 24px; font-size: 16px; }
.test-btn { background-color: #28a745; }
.check-btn { background-color: #17a2b8; }
.logout-btn { background-color: #dc3545; }

.session-profile-body {
    display: flex;
    align-items: center;
    margin-bottom: 20px;
}

.session-avatar {
    width: 80px;
    height: 80px;
    border-radius: 50%;
    margin-right: 20px;
}

.session-actions {
    margin-bottom: 20px;
}

.session-help {
    margin-top: 40px;
    padding: 20px;
    background-color: #f8f9fa;
    border-radius: 4px;
}

.activity-log-entry.error { color: #d8000c; }
.activity-log-entry.warning { color: #8a5300; }
.activity-log-entry.success { color: #1e7e34; }
.activity-log-time { color: #787774; font-family: monospace; }
.activity-log-tag { font-weight: 600; }
.activity-log-entries { list-style: none; padding: 0; }
.activity-log-empty { color: #787774; }
"#;
