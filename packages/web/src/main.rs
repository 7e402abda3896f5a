use dioxus::prelude::*;

use ui::{SessionProvider, SessionWidget, GOOGLE_IDENTITY_SCRIPT};

fn main() {
    tracing::info!("Starting Google sign-in demo");
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        // Google Identity Services provides the authorization-code popup
        document::Script { src: GOOGLE_IDENTITY_SCRIPT }

        SessionProvider {
            SessionWidget {}
        }
    }
}
