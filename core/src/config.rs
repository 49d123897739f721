//! Base URL selection.
//!
//! The startup routine resolves a `ClientConfig` once and passes it to
//! `Api::from_config`. Nothing in the client reads the environment on its own.

use thiserror::Error;

/// Variable that selects the runtime mode; `production` means production.
pub const APP_ENV: &str = "APP_ENV";
/// Public origin of the site in production, e.g. `https://example.com`.
pub const APP_ORIGIN: &str = "APP_ORIGIN";
/// Full API base URL in development.
pub const API_PATH: &str = "API_PATH";

/// Suffix appended to the origin in production.
const PRODUCTION_API_SUFFIX: &str = "/api";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeMode {
    Production,
    Development,
}

impl RuntimeMode {
    fn from_app_env(value: Option<&str>) -> Self {
        match value {
            Some("production") => RuntimeMode::Production,
            _ => RuntimeMode::Development,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Production talks to `<origin>/api`; development uses the URL given
    /// verbatim.
    pub fn for_mode(mode: RuntimeMode, origin: Option<&str>, api_path: Option<&str>) -> Result<Self, ConfigError> {
        match mode {
            RuntimeMode::Production => {
                let origin = non_empty(origin).ok_or(ConfigError::Missing(APP_ORIGIN))?;
                Ok(Self::new(format!(
                    "{}{PRODUCTION_API_SUFFIX}",
                    origin.trim_end_matches('/')
                )))
            }
            RuntimeMode::Development => {
                let api_path = non_empty(api_path).ok_or(ConfigError::Missing(API_PATH))?;
                Ok(Self::new(api_path))
            }
        }
    }

    /// Resolve the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = RuntimeMode::from_app_env(lookup(APP_ENV).as_deref());
        Self::for_mode(mode, lookup(APP_ORIGIN).as_deref(), lookup(API_PATH).as_deref())
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
