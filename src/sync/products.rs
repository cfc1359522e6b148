//! Product catalogue pagination.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::shopify::{ApiError, ApiResult, ShopifyClient};

/// Products requested per page when the caller does not say.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Largest page the Admin API accepts.
pub const MAX_PAGE_SIZE: u32 = 250;

/// Hard ceiling on pages fetched by one sync.
pub const MAX_PAGES: u32 = 100;

const PRODUCTS_QUERY: &str = r#"
query Products($first: Int!, $after: String) {
  products(first: $first, after: $after) {
    edges {
      node {
        id
        title
        handle
        status
        description
      }
    }
    pageInfo {
      hasNextPage
      endCursor
    }
  }
}
"#;

/// A product as synced from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub status: String,
    #[serde(default)]
    pub description: String,
}

/// Outcome of a full catalogue walk.
#[derive(Debug, Clone, Serialize)]
pub struct ProductSync {
    pub products: Vec<Product>,
    pub pages: u32,
    /// True when the page ceiling stopped the walk before the last page.
    pub truncated: bool,
}

#[derive(Debug, Deserialize)]
struct ProductsData {
    products: Connection<Product>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Connection<T> {
    edges: Vec<Edge<T>>,
    page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
struct Edge<T> {
    node: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

/// Walk the products connection page by page.
///
/// Each page is a separate `execute` call, so a throttled page is retried on
/// its own and any terminal error aborts the whole walk.
pub async fn fetch_all_products(client: &ShopifyClient, page_size: u32) -> ApiResult<ProductSync> {
    let first = page_size.clamp(1, MAX_PAGE_SIZE);
    let mut products = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0;

    while pages < MAX_PAGES {
        let data: ProductsData = client
            .execute(PRODUCTS_QUERY, json!({ "first": first, "after": cursor }))
            .await?;
        pages += 1;

        let connection = data.products;
        products.extend(connection.edges.into_iter().map(|edge| edge.node));

        tracing::debug!(page = pages, total = products.len(), "Fetched product page");

        match (connection.page_info.has_next_page, connection.page_info.end_cursor) {
            (true, Some(next)) => cursor = Some(next),
            (true, None) => {
                tracing::warn!(page = pages, "Product page reports more pages but no end cursor");
                return Err(ApiError::NoData(Some("hasNextPage without endCursor".to_string())));
            }
            (false, _) => {
                return Ok(ProductSync {
                    products,
                    pages,
                    truncated: false,
                })
            }
        }
    }

    tracing::warn!(pages, total = products.len(), "Product sync stopped at page ceiling");
    Ok(ProductSync {
        products,
        pages,
        truncated: true,
    })
}
