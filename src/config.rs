//! Client construction and per-call options.
//!
//! Configuration is explicit: the environment is read by the caller at its
//! boundary (if at all) and threaded in as values here, never consulted by
//! this layer.

use crate::backoff::DEFAULT_BASE_DELAY;
use crate::headers::Headers;
use crate::idempotency::{uuid_token_source, TokenSource};
use crate::retry::DEFAULT_MAX_RETRIES;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Construction-time configuration for a resource client.
#[derive(Clone)]
pub struct ClientConfig {
    /// API host for relative endpoints, e.g. `https://api.example.com`.
    pub host: String,
    /// Rewrite absolute endpoint URLs onto `host`.
    pub override_host: bool,
    /// Retry budget for write/workflow calls.
    pub max_retries: usize,
    /// Base backoff delay.
    pub base_delay: Duration,
    /// Headers applied to every request before per-call extras.
    pub default_headers: Headers,
    /// Master switch for `Idempotency-Key` injection on writes.
    pub enable_idempotency: bool,
    /// Server-side dedup window, injected as `Idempotency-Timeout` when
    /// positive and finite.
    pub idempotency_timeout_secs: Option<f64>,
    /// Generator for fallback idempotency keys.
    pub token_source: TokenSource,
}

impl ClientConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            override_host: false,
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            default_headers: Headers::new(),
            enable_idempotency: true,
            idempotency_timeout_secs: None,
            token_source: uuid_token_source(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("override_host", &self.override_host)
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("default_headers", &self.default_headers)
            .field("enable_idempotency", &self.enable_idempotency)
            .field("idempotency_timeout_secs", &self.idempotency_timeout_secs)
            .field("token_source", &"<token source>")
            .finish()
    }
}

/// Per-call overrides. Owned by one call; never shared.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Extra headers merged over the configured defaults (extras win).
    pub headers: Headers,
    /// Query parameters for body-method calls (GET carries the payload).
    pub params: Value,
    /// Explicit idempotency key, used verbatim when non-empty.
    pub idempotency_key: Option<String>,
    /// Per-call override of the configured dedup window.
    pub idempotency_timeout_secs: Option<f64>,
    /// Suppress the `Idempotency-Key` header for this call.
    pub disable_idempotency: bool,
    /// Per-call override of [`ClientConfig::override_host`].
    pub override_host: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ClientConfig::new("https://api.example.com");
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.base_delay, Duration::from_millis(500));
        assert!(config.enable_idempotency);
        assert!(!config.override_host);
        assert!(config.idempotency_timeout_secs.is_none());
        assert!(config.default_headers.is_empty());
    }

    #[test]
    fn call_options_default_to_no_overrides() {
        let opts = CallOptions::default();
        assert!(opts.headers.is_empty());
        assert!(opts.params.is_null());
        assert!(opts.idempotency_key.is_none());
        assert!(!opts.disable_idempotency);
        assert!(opts.override_host.is_none());
    }
}
