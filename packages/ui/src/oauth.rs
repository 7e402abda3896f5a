//! # Google Identity Services code client
//!
//! The authorization-code popup is Google's own JavaScript
//! (`google.accounts.oauth2.initCodeClient`), loaded from
//! [`GOOGLE_IDENTITY_SCRIPT`]. [`GoogleCodeClient::request_code`] opens it and
//! turns its two callbacks into one awaitable result:
//!
//! - `callback({ code })` → `Ok(AuthorizationCode)`
//! - `callback({ error, error_description })` or `error_callback({ type })` →
//!   `Err(reason)`
//!
//! Outside the browser there is no popup to open and the call fails right away.

use api::settings::Google;
use api::AuthorizationCode;

/// Script tag source for Google Identity Services.
pub const GOOGLE_IDENTITY_SCRIPT: &str = "https://accounts.google.com/gsi/client";

/// Opens Google's consent popup with `flow = authorization-code`.
#[derive(Debug, Clone, PartialEq)]
pub struct GoogleCodeClient {
    client_id: String,
    scope: String,
}

impl GoogleCodeClient {
    pub fn new(client_id: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            scope: scope.into(),
        }
    }

    pub fn from_settings(google: &Google) -> Self {
        Self::new(google.client_id.clone(), google.scope.clone())
    }

    /// Run the popup flow and wait for its outcome. The error is the reason
    /// Google gave, for logging only.
    pub async fn request_code(&self) -> Result<AuthorizationCode, String> {
        if self.client_id.is_empty() {
            return Err("no Google client id configured".to_string());
        }
        #[cfg(all(target_arch = "wasm32", feature = "web"))]
        {
            gis::request_code(&self.client_id, &self.scope).await
        }
        #[cfg(not(all(target_arch = "wasm32", feature = "web")))]
        {
            tracing::debug!("Cannot request scopes {} outside the browser", self.scope);
            Err("Google sign-in popup is only available in the browser".to_string())
        }
    }
}

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod gis {
    use std::cell::RefCell;
    use std::rc::Rc;

    use api::AuthorizationCode;
    use futures::channel::oneshot;
    use js_sys::{Object, Reflect};
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen]
    extern "C" {
        type CodeClient;

        #[wasm_bindgen(catch, js_namespace = ["google", "accounts", "oauth2"], js_name = initCodeClient)]
        fn init_code_client(config: &Object) -> Result<CodeClient, JsValue>;

        #[wasm_bindgen(method, js_name = requestCode)]
        fn request_code(this: &CodeClient);
    }

    type Outcome = Result<AuthorizationCode, String>;
    type Sender = Rc<RefCell<Option<oneshot::Sender<Outcome>>>>;

    pub(super) async fn request_code(client_id: &str, scope: &str) -> Outcome {
        let (tx, rx) = oneshot::channel::<Outcome>();
        let tx: Sender = Rc::new(RefCell::new(Some(tx)));

        let on_response = {
            let tx = Rc::clone(&tx);
            Closure::<dyn FnMut(JsValue)>::new(move |response: JsValue| {
                let outcome = match string_field(&response, "code") {
                    Some(code) => Ok(AuthorizationCode::new(code)),
                    None => Err(string_field(&response, "error_description")
                        .or_else(|| string_field(&response, "error"))
                        .unwrap_or_else(|| "no authorization code returned".to_string())),
                };
                deliver(&tx, outcome);
            })
        };
        let on_error = {
            let tx = Rc::clone(&tx);
            Closure::<dyn FnMut(JsValue)>::new(move |error: JsValue| {
                let reason = string_field(&error, "type").unwrap_or_else(|| "unknown".to_string());
                deliver(&tx, Err(reason));
            })
        };

        let config = Object::new();
        set(&config, "client_id", &JsValue::from_str(client_id));
        set(&config, "scope", &JsValue::from_str(scope));
        set(&config, "ux_mode", &JsValue::from_str("popup"));
        set(&config, "callback", on_response.as_ref());
        set(&config, "error_callback", on_error.as_ref());

        let client = init_code_client(&config)
            .map_err(|e| format!("Google Identity Services unavailable: {:?}", e))?;
        client.request_code();

        // The closures must outlive the popup.
        let outcome = rx
            .await
            .unwrap_or_else(|_| Err("sign-in flow abandoned".to_string()));
        drop(on_response);
        drop(on_error);
        outcome
    }

    fn deliver(tx: &Sender, outcome: Outcome) {
        if let Some(tx) = tx.borrow_mut().take() {
            let _ = tx.send(outcome);
        }
    }

    fn string_field(value: &JsValue, name: &str) -> Option<String> {
        Reflect::get(value, &JsValue::from_str(name)).ok()?.as_string()
    }

    fn set(target: &Object, key: &str, value: &JsValue) {
        let _ = Reflect::set(target, &JsValue::from_str(key), value);
    }
}
