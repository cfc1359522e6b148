//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!
//! environment (SHOPIFY_ACCESS_TOKEN, SHOPIFY_STORE_DOMAIN)
//!     → ShopifyConfig::from_env, checked on every execute
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Secrets never live in the config file
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, ConfigError, CONFIG_PATH_ENV};
pub use schema::{AppConfig, ObservabilityConfig, RateLimitConfig, ServerConfig, ShopifySettings};
