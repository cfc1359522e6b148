//! Exponential backoff with jitter.

use std::time::Duration;
use rand::Rng;

/// Base delay used when the upstream response carries no `Retry-After` hint.
pub const DEFAULT_BASE_DELAY_MS: u64 = 2000;

/// Exclusive upper bound of the random jitter added to every wait.
pub const MAX_JITTER_MS: u64 = 1000;

/// Resolve the base delay from an optional `Retry-After` value in seconds.
pub fn base_delay_ms(retry_after_secs: Option<u64>) -> u64 {
    retry_after_secs
        .map(|secs| secs.saturating_mul(1000))
        .unwrap_or(DEFAULT_BASE_DELAY_MS)
}

/// Deterministic part of the wait: `base_ms * 2^attempt`.
pub fn base_wait(base_ms: u64, attempt: u32) -> Duration {
    let exponential_base = 2u64.saturating_pow(attempt);
    Duration::from_millis(base_ms.saturating_mul(exponential_base))
}

/// Calculate exponential backoff delay with jitter.
///
/// `attempt` is the number of retries already performed (0 before the first
/// retry). Jitter is uniform in `[0, MAX_JITTER_MS)` and added on top of the
/// exponentiated base.
pub fn calculate_backoff(base_ms: u64, attempt: u32) -> Duration {
    let jitter = rand::thread_rng().gen_range(0..MAX_JITTER_MS);
    base_wait(base_ms, attempt) + Duration::from_millis(jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_wait_doubles_per_attempt() {
        assert_eq!(base_wait(2000, 0), Duration::from_millis(2000));
        assert_eq!(base_wait(2000, 1), Duration::from_millis(4000));
        assert_eq!(base_wait(2000, 2), Duration::from_millis(8000));

        let waits: Vec<_> = (0..3).map(|a| base_wait(1500, a)).collect();
        assert!(waits.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_retry_after_overrides_default() {
        assert_eq!(base_delay_ms(None), DEFAULT_BASE_DELAY_MS);
        assert_eq!(base_delay_ms(Some(5)), 5000);
        assert_eq!(base_delay_ms(Some(0)), 0);
        assert_eq!(base_wait(base_delay_ms(Some(5)), 0), Duration::from_millis(5000));
    }

    #[test]
    fn test_jitter_bounds() {
        for attempt in 0..3 {
            let base = base_wait(5000, attempt);
            for _ in 0..50 {
                let delay = calculate_backoff(5000, attempt);
                assert!(delay >= base);
                assert!(delay < base + Duration::from_millis(MAX_JITTER_MS));
            }
        }
    }

    #[test]
    fn test_backoff_saturates() {
        let huge = base_wait(u64::MAX, 10);
        assert_eq!(huge, Duration::from_millis(u64::MAX));
    }
}
