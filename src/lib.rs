//! Storefront Guard Library
//!
//! Resilient Shopify Admin GraphQL client and in-memory request rate limiting
//! for the storefront admin dashboard.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod security;
pub mod shopify;
pub mod sync;

pub use config::schema::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use security::{RateLimitDecision, RateLimitPolicy, RateLimiter, RouteClass};
pub use shopify::{ApiError, ShopifyClient, ShopifyConfig};
