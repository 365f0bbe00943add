//! Client configuration: defaults plus environment overrides.

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:3000/api";
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_millis(3000);

const API_BASE_VAR: &str = "NOMINA_API_BASE";
const NOTIFICATION_TTL_VAR: &str = "NOMINA_NOTIFICATION_TTL_MS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

/// Settings handed to `ApiClient` and `Notifier` at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix joined to every relative endpoint.
    pub base_url: String,
    /// How long a notification stays on the page.
    pub notification_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a config from an arbitrary variable source. Unset variables
    /// fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base) = lookup(API_BASE_VAR) {
            let base = base.trim();
            if base.is_empty() {
                return Err(ConfigError::InvalidValue {
                    var: API_BASE_VAR,
                    value: base.to_string(),
                });
            }
            config.base_url = base.to_string();
        }

        if let Some(raw) = lookup(NOTIFICATION_TTL_VAR) {
            let millis: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: NOTIFICATION_TTL_VAR,
                value: raw.clone(),
            })?;
            config.notification_ttl = Duration::from_millis(millis);
        }

        Ok(config)
    }
}
