//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters for rate limiting and upstream retries)
//!
//! Consumers:
//!     → stdout (fmt subscriber)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event, never interpolated secrets
//! - Request ID flows through the HTTP layer
//! - Metrics are cheap counters; the exporter is optional

pub mod logging;
pub mod metrics;
