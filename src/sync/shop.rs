//! Shop summary query.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::shopify::{ApiResult, ShopifyClient};

const SHOP_QUERY: &str = "{ shop { name email myshopifyDomain currencyCode } }";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopSummary {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub myshopify_domain: String,
    pub currency_code: String,
}

#[derive(Debug, Deserialize)]
struct ShopData {
    shop: ShopSummary,
}

pub async fn fetch_shop(client: &ShopifyClient) -> ApiResult<ShopSummary> {
    let data: ShopData = client.execute(SHOP_QUERY, json!({})).await?;
    Ok(data.shop)
}
