//! Storefront Guard
//!
//! Core service of the storefront admin dashboard: a rate-limit aware
//! Shopify Admin GraphQL client and per-route in-memory request limiting.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ─────────────▶ http::server ──▶ middleware::rate_limit ──▶ handler
//!                         │                  │                     │
//!                         │            security::RateLimiter       ▼
//!                         │            (fixed windows, sweeper)  sync::*
//!                         │                                        │
//!                         │                                        ▼
//!                         │                              shopify::ShopifyClient
//!                         │                              (429 retry + backoff)
//!                         │                                        │
//!                         ▼                                        ▼
//!                 observability (tracing, metrics)        Shopify Admin API
//! ```

use tokio::net::TcpListener;

use storefront_guard::config;
use storefront_guard::http::HttpServer;
use storefront_guard::lifecycle::{signals, Shutdown};
use storefront_guard::observability::{logging, metrics};
use storefront_guard::shopify::{ShopifyClient, ShopifyConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_from_env()?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!("storefront-guard v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.server.bind_address,
        api_version = %config.shopify.api_version,
        rate_limit_enabled = config.rate_limit.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let shopify_config = ShopifyConfig::from_env(&config.shopify);
    if shopify_config.endpoint().is_err() {
        tracing::warn!("Shopify credentials missing; upstream routes will fail until they are set");
    }
    let shopify = ShopifyClient::new(shopify_config)?;

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_ctrl_c(shutdown.clone()));

    let server = HttpServer::new(config, shopify);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
