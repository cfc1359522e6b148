//! Shopify Admin GraphQL integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (access token, store domain)
//!     → types.rs (ShopifyConfig, endpoint resolution)
//!     → client.rs (execute: build request, retry on 429, decode envelope)
//!     → transport.rs (HTTP POST via reqwest, or a test double)
//! ```
//!
//! # Security Constraints
//! - Access token ONLY from environment variables
//! - Never log the access token
//! - Configuration is checked before any network call

pub mod client;
pub mod transport;
pub mod types;

pub use client::ShopifyClient;
pub use transport::{GraphqlRequest, GraphqlTransport, ReqwestTransport, TransportError, UpstreamResponse};
pub use types::{ApiError, ApiResult, GraphqlEnvelope, GraphqlErrorMessage, ShopifyConfig};
