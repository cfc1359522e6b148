//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → headers.rs (derive "<route-class>:<client-address>" identifier)
//!     → policy.rs (fixed policy for the route class)
//!     → rate_limit.rs (fixed window check, atomic per identifier)
//!     → admitted: pass to handler; rejected: 429 with retry hints
//! ```
//!
//! # Design Decisions
//! - Process-local state only; each instance enforces its own limits
//! - Rejection is a normal result, never an error
//! - Expired windows are ignored on read; the sweeper only bounds memory

pub mod headers;
pub mod policy;
pub mod rate_limit;

pub use headers::{client_address, rate_limit_key};
pub use policy::{RateLimitPolicy, RouteClass};
pub use rate_limit::{RateLimitDecision, RateLimitSweeper, RateLimitWindow, RateLimiter, DEFAULT_SWEEP_INTERVAL};
