//! Retry classification and the bounded retry loop.
//!
//! Semantics:
//! - `max_retries` counts retries, not attempts: a call makes at most
//!   `max_retries + 1` attempts.
//! - Classification runs in priority order: budget, permanent request-shape
//!   errors (415), the fixed non-retryable code set, rate limiting (429),
//!   network/timeout failures, then 5xx.
//! - When retry is denied the original error propagates unchanged, so callers
//!   see exactly what the transport produced.
//! - Delays come from [`crate::backoff`] and are awaited through an injected
//!   [`Sleeper`]; there is no wall-clock budget beyond the retry count.

use crate::backoff::{backoff_delay, thread_rng_jitter, JitterSource, DEFAULT_BASE_DELAY};
use crate::error::TransportError;
use crate::sleeper::{Sleeper, TokioSleeper};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Default retry budget.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Codes that mark a request as permanently broken. 429 is carved out below.
const NON_RETRYABLE_CODES: [i64; 9] = [400, 401, 403, 404, 405, 415, 601, 603, 604];

/// Transport-level codes for transient network failures.
const TRANSIENT_NETWORK_CODES: [&str; 3] = ["ETIMEDOUT", "ECONNRESET", "ENOTFOUND"];

fn is_unsupported_media_type(err: &TransportError) -> bool {
    err.has_code(415) || err.message.contains("415")
}

fn is_rate_limited(err: &TransportError) -> bool {
    err.has_code(429) || err.message.contains("429") || err.message.contains("限流")
}

fn is_network_or_timeout(err: &TransportError) -> bool {
    if err
        .name
        .as_deref()
        .is_some_and(|name| name.to_ascii_lowercase().contains("timeout"))
    {
        return true;
    }
    err.code
        .as_deref()
        .is_some_and(|code| TRANSIENT_NETWORK_CODES.contains(&code.to_ascii_uppercase().as_str()))
}

fn is_server_error(err: &TransportError) -> bool {
    err.collect_codes().iter().any(|code| (500..=599).contains(code))
}

/// Decide whether a failed attempt should be retried.
pub fn should_retry(err: &TransportError, attempt: usize, max_retries: usize) -> bool {
    if attempt >= max_retries {
        return false;
    }
    if is_unsupported_media_type(err) {
        return false;
    }
    let codes = err.collect_codes();
    if codes.iter().any(|code| NON_RETRYABLE_CODES.contains(code) && *code != 429) {
        return false;
    }
    if is_rate_limited(err) {
        return true;
    }
    if is_network_or_timeout(err) {
        return true;
    }
    if is_server_error(err) {
        return true;
    }
    false
}

/// Retry policy combining the classifier, backoff, jitter, and sleeper.
#[derive(Clone)]
pub struct RetryPolicy {
    max_retries: usize,
    base_delay: Duration,
    jitter: JitterSource,
    sleeper: Arc<dyn Sleeper>,
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("jitter", &"<jitter>")
            .field("sleeper", &"<sleeper>")
            .finish()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RetryPolicy {
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::new()
    }

    pub fn max_retries(&self) -> usize {
        self.max_retries
    }

    /// Run `operation`, retrying classified-transient failures with backoff.
    ///
    /// The last error is propagated unchanged when the budget is spent or the
    /// classifier denies a retry.
    pub async fn execute<T, Fut, Op>(&self, mut operation: Op) -> Result<T, TransportError>
    where
        Fut: Future<Output = Result<T, TransportError>>,
        Op: FnMut() -> Fut,
    {
        let mut attempt = 0usize;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if !should_retry(&err, attempt, self.max_retries) {
                        return Err(err);
                    }
                    let delay = backoff_delay(attempt, self.base_delay, &self.jitter);
                    tracing::warn!(
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        message = %err,
                        "retrying transient failure"
                    );
                    self.sleeper.sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// Builder for [`RetryPolicy`].
pub struct RetryPolicyBuilder {
    max_retries: usize,
    base_delay: Duration,
    jitter: JitterSource,
    sleeper: Arc<dyn Sleeper>,
}

impl RetryPolicyBuilder {
    pub fn new() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            jitter: thread_rng_jitter(),
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Retry budget; zero disables retrying entirely.
    pub fn max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn with_jitter(mut self, jitter: JitterSource) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_sleeper<S>(mut self, sleeper: S) -> Self
    where
        S: Sleeper + 'static,
    {
        self.sleeper = Arc::new(sleeper);
        self
    }

    pub fn build(self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_delay: self.base_delay,
            jitter: self.jitter,
            sleeper: self.sleeper,
        }
    }
}

impl Default for RetryPolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}
