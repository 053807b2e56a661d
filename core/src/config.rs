//! Client configuration.
//!
//! Every field resolves the same way: explicit argument, then environment
//! variable, then fallback. Only the timeout has a non-empty fallback.

use std::env;
use std::time::Duration;

/// Timeout used when neither an argument nor `API_TIMEOUT` supplies one.
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

pub const ENV_ENDPOINT: &str = "API_ENDPOINT";
pub const ENV_API_KEY: &str = "API_KEY";
pub const ENV_TIMEOUT: &str = "API_TIMEOUT";

/// Immutable settings for one `ApiClient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix joined to every relative path. May be empty.
    pub base_url: String,
    /// Default bearer credential. Empty means no `Authorization` header.
    pub api_key: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl ClientConfig {
    /// Resolve against the process environment.
    pub fn resolve(base_url: Option<String>, api_key: Option<String>, timeout_ms: Option<u64>) -> Self {
        Self::resolve_with(base_url, api_key, timeout_ms, |key| env::var(key).ok())
    }

    /// Resolve against an arbitrary variable lookup.
    ///
    /// A timeout of zero, from either source, counts as unset. Environment
    /// timeouts that do not parse as an integer are ignored.
    pub fn resolve_with<F>(
        base_url: Option<String>,
        api_key: Option<String>,
        timeout_ms: Option<u64>,
        lookup: F,
    ) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = base_url.or_else(|| lookup(ENV_ENDPOINT)).unwrap_or_default();
        let api_key = api_key.or_else(|| lookup(ENV_API_KEY)).unwrap_or_default();
        let timeout_ms = timeout_ms
            .filter(|ms| *ms > 0)
            .or_else(|| {
                lookup(ENV_TIMEOUT)
                    .and_then(|raw| raw.trim().parse::<u64>().ok())
                    .filter(|ms| *ms > 0)
            })
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        Self {
            base_url,
            api_key,
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    pub fn from_env() -> Self {
        Self::resolve(None, None, None)
    }

    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    /// A zero duration falls back to the default, matching `resolve`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = if timeout.is_zero() {
            Duration::from_millis(DEFAULT_TIMEOUT_MS)
        } else {
            timeout
        };
        self
    }
}
