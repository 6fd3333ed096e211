//! Exponential backoff with additive jitter.
//!
//! Delay for retry attempt `n` (0-based) is `base * 2^n` plus 0-100ms of
//! jitter drawn from an injected uniform `[0, 1)` source, so tests can pin
//! the jitter term to zero. Arithmetic saturates and the result is capped at
//! [`MAX_BACKOFF`] to stay safe for absurd attempt counts.

use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/// Default base delay between retries.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(500);

/// Delay ceiling applied when calculations saturate (1 day).
pub const MAX_BACKOFF: Duration = Duration::from_secs(24 * 60 * 60);

/// Uniform `[0, 1)` source feeding the additive jitter term.
pub type JitterSource = Arc<dyn Fn() -> f64 + Send + Sync>;

/// Jitter source backed by the thread-local RNG.
pub fn thread_rng_jitter() -> JitterSource {
    Arc::new(|| rand::rng().random::<f64>())
}

/// Compute the delay before retry `attempt`.
pub fn backoff_delay(attempt: usize, base: Duration, jitter: &JitterSource) -> Duration {
    let base_ms = u64::try_from(base.as_millis()).unwrap_or(u64::MAX);
    let exponent = u32::try_from(attempt).unwrap_or(u32::MAX);
    let scaled = base_ms.saturating_mul(2u64.saturating_pow(exponent));

    let drawn = (jitter)().clamp(0.0, 1.0);
    let jitter_ms = ((drawn * 101.0).floor() as u64).min(100);

    Duration::from_millis(scaled.saturating_add(jitter_ms)).min(MAX_BACKOFF)
}
