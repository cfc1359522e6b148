//! Shopify configuration, response envelope and error definitions.

use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use url::Url;

use crate::config::schema::ShopifySettings;
use crate::shopify::transport::TransportError;

/// Environment variable holding the Admin API access token.
pub const ACCESS_TOKEN_ENV: &str = "SHOPIFY_ACCESS_TOKEN";

/// Environment variable holding the store domain (e.g. `my-store.myshopify.com`).
pub const STORE_DOMAIN_ENV: &str = "SHOPIFY_STORE_DOMAIN";

/// Connection settings for the Admin GraphQL API.
///
/// Token and domain are optional here on purpose: their absence is reported
/// by [`ShopifyConfig::endpoint`] as a configuration error at call time.
#[derive(Clone)]
pub struct ShopifyConfig {
    pub access_token: Option<String>,
    pub store_domain: Option<String>,
    pub api_version: String,
    pub request_timeout: Duration,
}

impl ShopifyConfig {
    /// Read credentials from the environment, remaining settings from config.
    pub fn from_env(settings: &ShopifySettings) -> Self {
        Self {
            access_token: std::env::var(ACCESS_TOKEN_ENV).ok(),
            store_domain: std::env::var(STORE_DOMAIN_ENV).ok(),
            api_version: settings.api_version.clone(),
            request_timeout: Duration::from_secs(settings.request_timeout_secs),
        }
    }

    /// Resolve the GraphQL endpoint and access token.
    ///
    /// A domain given with an explicit `http://` or `https://` scheme is used
    /// as the base URL verbatim, otherwise `https://` is assumed.
    pub fn endpoint(&self) -> ApiResult<(Url, &str)> {
        let token = present(self.access_token.as_deref()).ok_or_else(|| {
            ApiError::Configuration(format!("{} is not set", ACCESS_TOKEN_ENV))
        })?;
        let domain = present(self.store_domain.as_deref()).ok_or_else(|| {
            ApiError::Configuration(format!("{} is not set", STORE_DOMAIN_ENV))
        })?;

        let base = if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", domain.trim_end_matches('/'))
        };

        let url = format!("{}/admin/api/{}/graphql.json", base, self.api_version);
        let url = Url::parse(&url).map_err(|e| {
            ApiError::Configuration(format!("Invalid store domain '{}': {}", domain, e))
        })?;

        Ok((url, token))
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShopifyConfig")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("store_domain", &self.store_domain)
            .field("api_version", &self.api_version)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// GraphQL response envelope: `{ data?, errors? }`.
#[derive(Debug, Deserialize)]
pub struct GraphqlEnvelope<T> {
    pub data: Option<T>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub errors: Vec<GraphqlErrorMessage>,
}

/// A single entry of the GraphQL `errors` array. Extra fields are ignored.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GraphqlErrorMessage {
    #[serde(default)]
    pub message: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<GraphqlErrorMessage>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<GraphqlErrorMessage>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Errors surfaced by [`ShopifyClient::execute`](crate::shopify::ShopifyClient::execute).
#[derive(Debug, Error)]
pub enum ApiError {
    /// Access token or store domain missing or unusable.
    #[error("Shopify configuration error: {0}")]
    Configuration(String),

    /// Network-level failure; never retried.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Upstream kept answering 429 past the retry ceiling.
    #[error("Shopify rate limit exceeded after {attempts} attempts (status {status})")]
    RateLimitExhausted { status: StatusCode, attempts: u32 },

    /// Any other non-2xx status.
    #[error("Shopify API error: {status} {status_text}")]
    Http { status: StatusCode, status_text: String },

    /// 2xx response whose envelope carried application errors.
    #[error("GraphQL errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    /// 2xx response without usable `data`.
    #[error("{}", no_data_message(.0))]
    NoData(Option<String>),
}

fn no_data_message(reason: &Option<String>) -> String {
    match reason {
        Some(reason) => format!("No data returned from Shopify: {}", reason),
        None => "No data returned from Shopify".to_string(),
    }
}

/// Result type for Shopify operations.
pub type ApiResult<T> = Result<T, ApiError>;
