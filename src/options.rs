use std::time::Duration;

use rand::Rng;

/// Per-attempt timeout applied to every upstream request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Configures retry behavior for upstream requests.
///
/// Built once at startup and shared read-only between requests.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,
    /// Backoff before the first retry; doubled for every later one.
    pub base_delay: Duration,
    /// Upper clamp applied to every computed delay.
    pub max_delay: Duration,
    /// HTTP status codes treated as transient.
    pub retryable_status_codes: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1_000),
            max_delay: Duration::from_millis(30_000),
            retryable_status_codes: vec![429, 500, 502, 503, 504],
        }
    }
}

impl RetryConfig {
    /// Total number of network attempts allowed for one logical call.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retryable_status_codes.contains(&status)
    }

    /// Backoff to wait after the failed `attempt` (1-based), with random jitter.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let unit = rand::thread_rng().gen_range(0.0..1.0);
        self.delay_with_jitter(attempt, unit)
    }

    /// Deterministic form of [`RetryConfig::delay_for`].
    ///
    /// `unit` picks the jitter inside `[0, 10%)` of the exponential delay and
    /// is expected in `[0, 1)`. The result never exceeds `max_delay`.
    pub fn delay_with_jitter(&self, attempt: u32, unit: f64) -> Duration {
        let exp = attempt.saturating_sub(1).min(31);
        let exponential = self.base_delay.saturating_mul(1u32 << exp);
        let unit = if unit.is_finite() {
            unit.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let jitter = exponential.mul_f64(0.1 * unit);
        exponential.saturating_add(jitter).min(self.max_delay)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::RetryConfig;

    fn config(base_ms: u64, max_ms: u64) -> RetryConfig {
        RetryConfig {
            base_delay: Duration::from_millis(base_ms),
            max_delay: Duration::from_millis(max_ms),
            ..RetryConfig::default()
        }
    }

    #[test]
    fn default_matches_documented_values() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.base_delay, Duration::from_millis(1_000));
        assert_eq!(config.max_delay, Duration::from_millis(30_000));
        assert_eq!(config.retryable_status_codes, vec![429, 500, 502, 503, 504]);
        assert_eq!(config.max_attempts(), 4);
    }

    #[test]
    fn zero_retries_allows_single_attempt() {
        let config = RetryConfig {
            max_retries: 0,
            ..RetryConfig::default()
        };
        assert_eq!(config.max_attempts(), 1);
    }

    #[test]
    fn delay_doubles_per_attempt_without_jitter() {
        let config = config(100, 60_000);
        assert_eq!(config.delay_with_jitter(1, 0.0), Duration::from_millis(100));
        assert_eq!(config.delay_with_jitter(2, 0.0), Duration::from_millis(200));
        assert_eq!(config.delay_with_jitter(3, 0.0), Duration::from_millis(400));
        assert_eq!(config.delay_with_jitter(4, 0.0), Duration::from_millis(800));
    }

    #[test]
    fn jitter_adds_at_most_ten_percent() {
        let config = config(1_000, 60_000);
        let half = config.delay_with_jitter(1, 0.5);
        assert!(half > Duration::from_millis(1_049) && half < Duration::from_millis(1_051));

        for attempt in 1..=4 {
            let base = config.delay_with_jitter(attempt, 0.0);
            let delay = config.delay_for(attempt);
            assert!(delay >= base);
            assert!(delay < base + base / 10 + Duration::from_millis(1));
        }
    }

    #[test]
    fn delay_is_clamped_to_max_delay() {
        let config = config(1_000, 5_000);
        assert_eq!(config.delay_with_jitter(3, 0.0), Duration::from_millis(4_000));
        assert_eq!(config.delay_with_jitter(4, 0.0), Duration::from_millis(5_000));
        assert_eq!(config.delay_with_jitter(40, 0.99), Duration::from_millis(5_000));
        assert_eq!(config.delay_with_jitter(u32::MAX, 0.5), Duration::from_millis(5_000));
    }

    #[test]
    fn retryable_status_lookup_uses_configured_codes() {
        let config = RetryConfig {
            retryable_status_codes: vec![503],
            ..RetryConfig::default()
        };
        assert!(config.is_retryable_status(503));
        assert!(!config.is_retryable_status(429));
        assert!(!config.is_retryable_status(404));
    }
}
