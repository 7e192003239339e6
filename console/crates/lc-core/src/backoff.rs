use std::time::Duration;

// Reconnect defaults for a dropped console stream:
// - First retry after 1 second
// - Grow each wait by 1.5x
// - Never wait longer than 10 seconds between attempts
pub const DEFAULT_BASE_DELAY_MS: u64 = 1000;
pub const DEFAULT_BACKOFF_FACTOR: f64 = 1.5;
pub const DEFAULT_MAX_DELAY_MS: u64 = 10_000;

/// Exponential backoff without jitter.
///
/// `delay(n) = min(base * factor^n, max_delay)`. Construction clamps
/// `factor` to at least 1.0 and `base` to at most `max_delay`, so the
/// sequence is always non-decreasing and bounded by `max_delay`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffPolicy {
    base: Duration,
    factor: f64,
    max_delay: Duration,
}

impl BackoffPolicy {
    pub fn new(base: Duration, factor: f64, max_delay: Duration) -> Self {
        let factor = if factor.is_finite() && factor >= 1.0 {
            factor
        } else {
            1.0
        };

        Self {
            base: base.min(max_delay),
            factor,
            max_delay,
        }
    }

    /// Wait before the retry that follows `attempt` failed attempts.
    pub fn delay(&self, attempt: u32) -> Duration {
        let cap_ms = self.max_delay.as_secs_f64() * 1000.0;
        let raw_ms = self.base.as_secs_f64() * 1000.0 * self.factor.powf(f64::from(attempt));

        // powf overflows to +inf for large attempts; min() saturates it at the cap
        let millis = if raw_ms.is_nan() {
            cap_ms
        } else {
            raw_ms.min(cap_ms)
        };

        Duration::from_millis(millis.round() as u64)
    }

    pub fn base(&self) -> Duration {
        self.base
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(DEFAULT_BASE_DELAY_MS),
            DEFAULT_BACKOFF_FACTOR,
            Duration::from_millis(DEFAULT_MAX_DELAY_MS),
        )
    }
}
