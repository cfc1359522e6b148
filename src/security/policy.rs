//! Rate limit policies per route class.

use std::time::Duration;

/// Immutable admission policy: at most `limit` requests per `window`.
///
/// Both values must be non-zero. The limiter rejects everything under a
/// zero limit rather than opening a window it would immediately overfill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub limit: u32,
    pub window: Duration,
}

impl RateLimitPolicy {
    pub const fn new(limit: u32, window: Duration) -> Self {
        debug_assert!(limit > 0 && !window.is_zero(), "rate limit policy must be non-zero");
        Self { limit, window }
    }

    /// `limit` requests per 60 second window.
    pub const fn per_minute(limit: u32) -> Self {
        Self::new(limit, Duration::from_secs(60))
    }
}

/// Named route classes, each with a fixed policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteClass {
    /// Login and session endpoints.
    Auth,
    /// Password reset and change.
    Password,
    /// AI content generation.
    Ai,
    /// Product sync from the store.
    Sync,
    /// Mutating CRUD endpoints.
    Write,
    /// Read-only endpoints.
    Read,
}

impl RouteClass {
    pub const ALL: [RouteClass; 6] = [
        RouteClass::Auth,
        RouteClass::Password,
        RouteClass::Ai,
        RouteClass::Sync,
        RouteClass::Write,
        RouteClass::Read,
    ];

    pub const fn policy(self) -> RateLimitPolicy {
        match self {
            RouteClass::Auth => RateLimitPolicy::per_minute(5),
            RouteClass::Password => RateLimitPolicy::per_minute(3),
            RouteClass::Ai => RateLimitPolicy::per_minute(20),
            RouteClass::Sync => RateLimitPolicy::per_minute(5),
            RouteClass::Write => RateLimitPolicy::per_minute(60),
            RouteClass::Read => RateLimitPolicy::per_minute(100),
        }
    }

    /// Prefix used in limiter identifiers.
    pub const fn as_str(self) -> &'static str {
        match self {
            RouteClass::Auth => "auth",
            RouteClass::Password => "password",
            RouteClass::Ai => "ai",
            RouteClass::Sync => "sync",
            RouteClass::Write => "write",
            RouteClass::Read => "read",
        }
    }
}

impl std::fmt::Display for RouteClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "rate limit policy must be non-zero")]
    fn test_zero_limit_rejected_in_debug() {
        let _ = RateLimitPolicy::new(0, Duration::from_secs(60));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "rate limit policy must be non-zero")]
    fn test_zero_window_rejected_in_debug() {
        let _ = RateLimitPolicy::new(5, Duration::ZERO);
    }

    #[test]
    fn test_policy_table() {
        let table: Vec<(&str, u32, u64)> = RouteClass::ALL
            .iter()
            .map(|c| (c.as_str(), c.policy().limit, c.policy().window.as_millis() as u64))
            .collect();

        assert_eq!(
            table,
            vec![
                ("auth", 5, 60_000),
                ("password", 3, 60_000),
                ("ai", 20, 60_000),
                ("sync", 5, 60_000),
                ("write", 60, 60_000),
                ("read", 100, 60_000),
            ]
        );
    }
}
