//! Client configuration.
//!
//! `ClientConfig::default()` talks to the public API with each endpoint's own
//! timeout and no credentials. `from_env` reads the same settings from the
//! process environment.

use std::time::Duration;

use crate::auth::Credentials;
use crate::error::ApiError;

pub const ENV_BASE_URL: &str = "CF_API_BASE_URL";
pub const ENV_KEY: &str = "CF_API_KEY";
pub const ENV_SECRET: &str = "CF_API_SECRET";
pub const ENV_TIMEOUT_SECS: &str = "CF_API_TIMEOUT_SECS";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientConfig {
    /// Replaces every descriptor's base URL, e.g. to target a stub server.
    pub base_url: Option<String>,
    /// Needed only for endpoints that require signing.
    pub credentials: Option<Credentials>,
    /// Replaces every descriptor's timeout.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Read `CF_API_BASE_URL`, `CF_API_KEY`/`CF_API_SECRET` and `CF_API_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like `from_env`, reading variables through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let credentials = match (var(ENV_KEY), var(ENV_SECRET)) {
            (Some(key), Some(secret)) => Some(Credentials::new(key, secret)),
            (None, None) => None,
            _ => {
                return Err(ApiError::Config {
                    reason: format!("{ENV_KEY} and {ENV_SECRET} must be set together"),
                })
            }
        };

        let timeout = var(ENV_TIMEOUT_SECS)
            .map(|raw| {
                raw.trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|secs| secs.is_finite() && *secs > 0.0)
                    .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
                    .ok_or_else(|| ApiError::Config {
                        reason: format!("{ENV_TIMEOUT_SECS} must be a positive number, got {raw:?}"),
                    })
            })
            .transpose()?;

        Ok(Self {
            base_url: var(ENV_BASE_URL),
            credentials,
            timeout,
        })
    }
}
