//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → middleware/rate_limit.rs (per route class admission)
//!     → handlers (shop, product sync)
//!     → response.rs (429 hints, ApiError → status mapping)
//! ```

pub mod middleware;
pub mod response;
pub mod server;

pub use server::{build_router, AppState, HttpServer};
