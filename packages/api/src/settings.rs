//! Runtime settings: where the backend lives and which Google client to use.
//!
//! Native builds layer built-in defaults, an optional `session-widget.toml` in
//! the working directory, a `.env` file and `WIDGET_`-prefixed environment
//! variables (`WIDGET_BACKEND__BASE_URL`, `WIDGET_GOOGLE__CLIENT_ID`, ...).
//! The browser has neither files nor an environment, so web builds read the same
//! variables at compile time instead.

use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_SCOPE: &str = "openid email profile";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Backend {
    pub base_url: String,
}

impl Default for Backend {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Google {
    pub client_id: String,
    /// Space-separated OAuth scopes.
    pub scope: String,
}

impl Default for Google {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            scope: DEFAULT_SCOPE.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub backend: Backend,
    pub google: Google,
}

impl Settings {
    /// Load settings, falling back to defaults if the sources are unreadable.
    pub fn load() -> Self {
        match Self::new() {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Failed to load settings, using defaults: {}", e);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn new() -> Result<Self, config::ConfigError> {
        use config::{Config, Environment, File, FileFormat};

        dotenvy::dotenv().ok();

        let config = Config::builder()
            .set_default("backend.base_url", DEFAULT_BASE_URL)?
            .set_default("google.client_id", "")?
            .set_default("google.scope", DEFAULT_SCOPE)?
            .add_source(
                File::with_name("session-widget.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix("WIDGET")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        config.try_deserialize()
    }

    #[cfg(target_arch = "wasm32")]
    pub fn new() -> Result<Self, std::convert::Infallible> {
        let mut settings = Self::default();
        if let Some(base_url) = option_env!("WIDGET_BACKEND__BASE_URL") {
            settings.backend.base_url = base_url.to_string();
        }
        if let Some(client_id) = option_env!("WIDGET_GOOGLE__CLIENT_ID") {
            settings.google.client_id = client_id.to_string();
        }
        Ok(settings)
    }
}
