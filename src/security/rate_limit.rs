//! Fixed window rate limiting.
//!
//! # Algorithm
//! ```text
//! no window, or window expired → open a new one with count = 1, admit
//! count >= limit               → reject, window untouched
//! otherwise                    → count += 1, admit
//! ```
//!
//! The read-modify-write for one identifier runs under the DashMap shard
//! lock held by the entry API, so `count` never exceeds `limit`.

use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use crate::security::policy::RateLimitPolicy;

/// Default interval between sweeps of expired windows.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Counter state for one identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitWindow {
    /// Requests admitted in the current window.
    pub count: u32,
    /// Instant at which the window expires.
    pub reset_at: Instant,
}

impl RateLimitWindow {
    fn open(now: Instant, policy: &RateLimitPolicy) -> Self {
        Self {
            count: 1,
            reset_at: now + policy.window,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.reset_at
    }
}

/// Result of a single admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub admitted: bool,
    pub remaining: u32,
    /// Time until the current window resets.
    pub reset_in: Duration,
}

impl RateLimitDecision {
    fn admitted(remaining: u32, reset_in: Duration) -> Self {
        Self { admitted: true, remaining, reset_in }
    }

    fn rejected(reset_in: Duration) -> Self {
        Self { admitted: false, remaining: 0, reset_in }
    }

    /// Seconds until reset, rounded up.
    pub fn reset_in_secs(&self) -> u64 {
        self.reset_in.as_millis().div_ceil(1000) as u64
    }
}

/// In-memory fixed window rate limiter shared by all handlers.
///
/// Cloning is cheap; clones share the same table.
#[derive(Debug, Clone, Default)]
pub struct RateLimiter {
    windows: Arc<DashMap<String, RateLimitWindow>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check and record a request for `identifier` under `policy`.
    pub fn check(&self, identifier: &str, policy: &RateLimitPolicy) -> RateLimitDecision {
        self.check_at(identifier, policy, Instant::now())
    }

    /// Same as [`check`](Self::check) with an explicit clock reading.
    pub fn check_at(&self, identifier: &str, policy: &RateLimitPolicy, now: Instant) -> RateLimitDecision {
        if policy.limit == 0 {
            return RateLimitDecision::rejected(policy.window);
        }

        match self.windows.entry(identifier.to_owned()) {
            Entry::Vacant(slot) => {
                slot.insert(RateLimitWindow::open(now, policy));
                RateLimitDecision::admitted(policy.limit.saturating_sub(1), policy.window)
            }
            Entry::Occupied(mut slot) => {
                let window = slot.get_mut();
                if window.is_expired(now) {
                    *window = RateLimitWindow::open(now, policy);
                    RateLimitDecision::admitted(policy.limit.saturating_sub(1), policy.window)
                } else if window.count >= policy.limit {
                    RateLimitDecision::rejected(window.reset_at.saturating_duration_since(now))
                } else {
                    window.count += 1;
                    RateLimitDecision::admitted(
                        policy.limit - window.count,
                        window.reset_at.saturating_duration_since(now),
                    )
                }
            }
        }
    }

    /// Remove every expired window. Returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Instant::now())
    }

    pub fn sweep_expired_at(&self, now: Instant) -> usize {
        let mut removed = 0;
        self.windows.retain(|_, window| {
            let keep = !window.is_expired(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    /// Snapshot of the window for `identifier`, expired or not.
    pub fn window(&self, identifier: &str) -> Option<RateLimitWindow> {
        self.windows.get(identifier).map(|w| *w.value())
    }

    /// Number of tracked identifiers, including expired-but-unswept ones.
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Spawn the background sweeper; it stops when `shutdown` fires.
    pub fn spawn_sweeper(&self, interval: Duration, shutdown: broadcast::Receiver<()>) -> JoinHandle<()> {
        let sweeper = RateLimitSweeper::new(self.clone(), interval);
        tokio::spawn(sweeper.run(shutdown))
    }
}

/// Periodic garbage collection of expired windows.
pub struct RateLimitSweeper {
    limiter: RateLimiter,
    interval: Duration,
}

impl RateLimitSweeper {
    pub fn new(limiter: RateLimiter, interval: Duration) -> Self {
        Self { limiter, interval }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(interval_secs = self.interval.as_secs(), "Rate limit sweeper starting");

        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = self.limiter.sweep_expired();
                    tracing::debug!(
                        removed,
                        remaining = self.limiter.len(),
                        "Swept expired rate limit windows"
                    );
                }
                _ = shutdown.recv() => {
                    tracing::info!("Rate limit sweeper received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
