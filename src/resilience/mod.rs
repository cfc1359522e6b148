//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Upstream GraphQL call:
//!     → retries.rs (classify the response: success, rate limited, terminal)
//!     → On 429: backoff.rs (exponential delay from Retry-After or default, plus jitter)
//!     → sleep, resubmit the identical request
//!     → After MAX_RETRIES: typed exhaustion error
//! ```
//!
//! # Design Decisions
//! - Only the upstream rate-limit signal is retried; transport and HTTP errors fail fast
//! - Retry-After from upstream overrides the local default base delay
//! - Jitter is drawn independently per attempt and never compounded

pub mod backoff;
pub mod retries;

pub use backoff::{base_delay_ms, base_wait, calculate_backoff, DEFAULT_BASE_DELAY_MS, MAX_JITTER_MS};
pub use retries::{AttemptOutcome, RetryAttempt, MAX_RETRIES};
