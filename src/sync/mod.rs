//! Store data retrieval built on the Shopify client.
//!
//! # Data Flow
//! ```text
//! Handler (sync / read route)
//!     → products.rs (cursor pagination over the products connection)
//!     → shop.rs (shop summary)
//!     → ShopifyClient::execute (retries on 429 per page)
//! ```

pub mod products;
pub mod shop;

pub use products::{fetch_all_products, Product, ProductSync, DEFAULT_PAGE_SIZE, MAX_PAGES};
pub use shop::{fetch_shop, ShopSummary};
