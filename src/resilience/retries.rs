//! Retry bookkeeping for upstream rate-limit responses.
//!
//! # Responsibilities
//! - Classify each upstream response into an attempt outcome
//! - Plan the wait before the next attempt
//! - Bound the number of retries
//!
//! # Design Decisions
//! - Only 429 Too Many Requests is retryable
//! - Attempt records live for a single call and are never shared

use std::time::Duration;
use reqwest::StatusCode;

use crate::resilience::backoff::{base_delay_ms, calculate_backoff};

/// Maximum number of retries after the initial attempt.
pub const MAX_RETRIES: u32 = 3;

/// Outcome of a single upstream attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// 2xx response, hand the body to the decoder.
    Success,
    /// 429 response, eligible for another attempt.
    RateLimited,
    /// Any other status; no retry.
    Terminal,
}

impl AttemptOutcome {
    pub fn classify(status: StatusCode) -> Self {
        if status == StatusCode::TOO_MANY_REQUESTS {
            AttemptOutcome::RateLimited
        } else if status.is_success() {
            AttemptOutcome::Success
        } else {
            AttemptOutcome::Terminal
        }
    }
}

/// A single attempt of one client call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryAttempt {
    /// Retries already performed before this attempt (0-based).
    pub attempt: u32,
    /// Wait computed before the next attempt; zero unless rate limited.
    pub delay: Duration,
    pub outcome: AttemptOutcome,
}

impl RetryAttempt {
    /// Record an attempt, computing the backoff when it was rate limited.
    pub fn record(attempt: u32, status: StatusCode, retry_after_secs: Option<u64>) -> Self {
        let outcome = AttemptOutcome::classify(status);
        let delay = match outcome {
            AttemptOutcome::RateLimited => calculate_backoff(base_delay_ms(retry_after_secs), attempt),
            _ => Duration::ZERO,
        };
        Self { attempt, delay, outcome }
    }

    /// Whether another attempt is allowed after this one.
    pub fn should_retry(&self) -> bool {
        self.outcome == AttemptOutcome::RateLimited && self.attempt < MAX_RETRIES
    }
}
