//! Shared utilities for integration tests.

use std::time::Duration;

use serde_json::{json, Value};
use storefront_guard::shopify::{ShopifyClient, ShopifyConfig};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "shpat_integration";
pub const API_VERSION: &str = "2024-10";

pub fn graphql_path() -> String {
    format!("/admin/api/{}/graphql.json", API_VERSION)
}

/// Client pointed at the mock server.
pub fn client_for(server: &MockServer) -> ShopifyClient {
    client_with(Some(TEST_TOKEN), Some(&server.uri()))
}

#[allow(dead_code)]
pub fn client_with(token: Option<&str>, domain: Option<&str>) -> ShopifyClient {
    let config = ShopifyConfig {
        access_token: token.map(String::from),
        store_domain: domain.map(String::from),
        api_version: API_VERSION.to_string(),
        request_timeout: Duration::from_secs(5),
    };
    ShopifyClient::new(config).expect("shopify client")
}

/// A GraphQL POST carrying the test token.
pub fn graphql_post() -> wiremock::MockBuilder {
    Mock::given(method("POST"))
        .and(path(graphql_path()))
        .and(header("X-Shopify-Access-Token", TEST_TOKEN))
}

pub fn throttled() -> ResponseTemplate {
    ResponseTemplate::new(429)
        .insert_header("Retry-After", "0")
        .set_body_json(json!({ "errors": [{ "message": "Throttled" }] }))
}

#[allow(dead_code)]
pub fn shop_body() -> Value {
    json!({ "data": { "shop": {
        "name": "Demo Store",
        "email": "owner@example.com",
        "myshopifyDomain": "demo.myshopify.com",
        "currencyCode": "USD"
    }}})
}

#[allow(dead_code)]
pub fn single_product_page() -> Value {
    json!({ "data": { "products": {
        "edges": [{ "node": {
            "id": "gid://shopify/Product/1",
            "title": "Linen Shirt",
            "handle": "linen-shirt",
            "status": "ACTIVE",
            "description": "Breathable summer shirt"
        }}],
        "pageInfo": { "hasNextPage": false, "endCursor": null }
    }}})
}
