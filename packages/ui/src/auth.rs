//! Session context, hooks and the buttons that drive the sign-in flow.

use std::rc::Rc;

use api::{Session, SessionCell, SessionError, Settings, TokenVerdict, UserProfile};
use dioxus::prelude::*;

use crate::activity_log::{log_activity, use_activity_log, ActivityLog, LogLevel};
use crate::oauth::GoogleCodeClient;
use crate::platform::{make_client, PlatformClient};
use crate::Icon;
use crate::icons::FaGoogle;

/// Collaborators shared by every session component.
#[derive(Clone)]
pub struct SessionContext {
    pub client: Rc<PlatformClient>,
    pub oauth: GoogleCodeClient,
}

impl SessionContext {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            client: Rc::new(make_client(settings)),
            oauth: GoogleCodeClient::from_settings(&settings.google),
        }
    }
}

/// Get the current session state.
/// Returns a signal that updates when the user logs in or out.
pub fn use_session() -> Signal<Session> {
    use_context::<Signal<Session>>()
}

pub fn use_session_context() -> SessionContext {
    use_context::<SessionContext>()
}

/// Provider component that owns the session state.
/// Wrap the widget with this component; it restores a stored profile once on
/// mount, without any network call.
#[component]
pub fn SessionProvider(children: Element) -> Element {
    let mut session = use_signal(Session::default);
    let log = use_signal(ActivityLog::default);
    let context = use_hook(|| SessionContext::from_settings(&Settings::load()));

    use_context_provider(|| session);
    use_context_provider(|| log);
    use_context_provider(|| context.clone());

    use_hook(|| {
        let client = Rc::clone(&context.client);
        spawn(async move {
            if let Some(user) = client.rehydrate().await {
                session.write().user = Some(user);
            }
        })
    });

    rsx! {
        {children}
    }
}

/// The session signal as the [`SessionCell`] the client updates.
struct SessionSignal(Signal<Session>);

impl SessionCell for SessionSignal {
    fn update<R>(&mut self, f: impl FnOnce(&mut Session) -> R) -> R {
        f(&mut *self.0.write())
    }
}

/// Open the Google popup and, if it yields a code, exchange it.
pub async fn sign_in(
    context: SessionContext,
    session: Signal<Session>,
    log: Signal<ActivityLog>,
) {
    let outcome = context.oauth.request_code().await;
    let result = context
        .client
        .sign_in(&mut SessionSignal(session), outcome)
        .await;
    report_login(log, result);
}

fn report_login(mut log: Signal<ActivityLog>, result: Result<UserProfile, SessionError>) {
    match result {
        Ok(user) => log_activity(
            &mut log,
            LogLevel::Success,
            &format!("Signed in as {}", user.display_name()),
        ),
        Err(e @ SessionError::LoginInFlight) => {
            log_activity(&mut log, LogLevel::Warning, &e.to_string())
        }
        Err(e) => {
            tracing::error!("Login error: {}", e);
            log_activity(&mut log, LogLevel::Error, &e.to_string());
        }
    }
}

/// Forget the stored credentials and clear the session.
pub async fn sign_out(
    context: SessionContext,
    session: Signal<Session>,
    mut log: Signal<ActivityLog>,
) {
    context.client.sign_out(&mut SessionSignal(session)).await;
    log_activity(&mut log, LogLevel::Info, "Logged out");
}

/// Call the protected profile endpoint with the stored token.
pub async fn test_protected_call(
    context: SessionContext,
    session: Signal<Session>,
    mut log: Signal<ActivityLog>,
) {
    match context.client.protected_call(&mut SessionSignal(session)).await {
        Ok(data) => {
            tracing::info!("Profile data: {:?}", data);
            log_activity(
                &mut log,
                LogLevel::Success,
                "API call successful! Check console for details.",
            );
        }
        Err(e) => report(log, &e),
    }
}

/// Ask the backend whether the stored token is still valid.
pub async fn check_token(
    context: SessionContext,
    session: Signal<Session>,
    mut log: Signal<ActivityLog>,
) {
    match context.client.check_token(&mut SessionSignal(session)).await {
        Ok(verdict) => {
            let level = match &verdict {
                TokenVerdict::Valid(_) => LogLevel::Success,
                TokenVerdict::Invalid { .. } => LogLevel::Warning,
            };
            log_activity(&mut log, level, verdict.acknowledgment());
        }
        Err(e) => report(log, &e),
    }
}

fn report(mut log: Signal<ActivityLog>, error: &SessionError) {
    tracing::error!("Session operation failed: {}", error);
    log_activity(&mut log, LogLevel::Error, &error.to_string());
}

/// Button that starts the Google sign-in flow.
#[component]
pub fn LoginButton(
    #[props(default = "Sign in with Google".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let session = use_session();
    let log = use_activity_log();
    let context = use_session_context();
    // Popup open; `session.loading` only covers the backend exchange.
    let mut requesting = use_signal(|| false);
    let busy = requesting() || session().loading;

    let onclick = move |_| {
        let context = context.clone();
        async move {
            if requesting() || session.peek().loading {
                return;
            }
            requesting.set(true);
            sign_in(context, session, log).await;
            requesting.set(false);
        }
    };

    rsx! {
        button {
            class: "{class}",
            disabled: busy,
            onclick: onclick,
            if busy {
                "Logging in..."
            } else {
                Icon { icon: FaGoogle, width: 16, height: 16 }
                span { " {label}" }
            }
        }
    }
}

/// Button to log out the current user.
#[component]
pub fn LogoutButton(
    #[props(default = "Logout".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let session = use_session();
    let log = use_activity_log();
    let context = use_session_context();

    let onclick = move |_| sign_out(context.clone(), session, log);

    rsx! {
        button {
            class: "{class}",
            onclick: onclick,
            "{label}"
        }
    }
}
