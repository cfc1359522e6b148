//! Shopify Admin GraphQL client with rate-limit aware retries.
//!
//! # Responsibilities
//! - Validate configuration before touching the network
//! - Retry 429 responses with exponential backoff and jitter
//! - Decode the GraphQL envelope into the caller's type

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::observability::metrics;
use crate::resilience::retries::{AttemptOutcome, RetryAttempt, MAX_RETRIES};
use crate::shopify::transport::{GraphqlRequest, GraphqlTransport, ReqwestTransport, UpstreamResponse};
use crate::shopify::types::{ApiError, ApiResult, GraphqlEnvelope, ShopifyConfig};

/// Shopify Admin GraphQL client.
#[derive(Clone)]
pub struct ShopifyClient {
    config: ShopifyConfig,
    transport: Arc<dyn GraphqlTransport>,
}

impl ShopifyClient {
    /// Create a client using the reqwest transport.
    pub fn new(config: ShopifyConfig) -> ApiResult<Self> {
        let transport = ReqwestTransport::new(config.request_timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client over an arbitrary transport.
    pub fn with_transport(config: ShopifyConfig, transport: Arc<dyn GraphqlTransport>) -> Self {
        Self { config, transport }
    }

    /// Execute a GraphQL document and decode `data` into `T`.
    ///
    /// Only 429 responses are retried, at most [`MAX_RETRIES`] times. Every
    /// other failure is returned as soon as it is observed.
    pub async fn execute<T: DeserializeOwned>(&self, query: &str, variables: Value) -> ApiResult<T> {
        let (endpoint, access_token) = self.config.endpoint()?;
        let request = GraphqlRequest {
            query: query.to_string(),
            variables,
        };

        for attempt in 0..=MAX_RETRIES {
            let response = self.transport.post(&endpoint, access_token, &request).await?;
            let record = RetryAttempt::record(attempt, response.status, response.retry_after_secs);

            tracing::debug!(
                attempt = record.attempt + 1,
                status = %response.status,
                outcome = ?record.outcome,
                "Shopify GraphQL attempt finished"
            );

            match record.outcome {
                AttemptOutcome::Success => return decode(response),
                AttemptOutcome::Terminal => {
                    return Err(ApiError::Http {
                        status: response.status,
                        status_text: response.status.canonical_reason().unwrap_or("").to_string(),
                    });
                }
                AttemptOutcome::RateLimited if record.should_retry() => {
                    tracing::warn!(
                        attempt = record.attempt + 1,
                        max_retries = MAX_RETRIES,
                        wait_ms = record.delay.as_millis() as u64,
                        retry_after_secs = ?response.retry_after_secs,
                        "Shopify rate limited, backing off"
                    );
                    metrics::record_upstream_retry();
                    tokio::time::sleep(record.delay).await;
                }
                AttemptOutcome::RateLimited => break,
            }
        }

        tracing::error!(
            attempts = MAX_RETRIES + 1,
            "Shopify rate limit persisted after all retries"
        );
        metrics::record_upstream_exhausted();
        Err(ApiError::RateLimitExhausted {
            status: reqwest::StatusCode::TOO_MANY_REQUESTS,
            attempts: MAX_RETRIES + 1,
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &ShopifyConfig {
        &self.config
    }
}

impl std::fmt::Debug for ShopifyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyClient")
            .field("config", &self.config)
            .finish()
    }
}

/// Decode a 2xx body: application errors win over data, missing data is an error.
fn decode<T: DeserializeOwned>(response: UpstreamResponse) -> ApiResult<T> {
    let envelope: GraphqlEnvelope<Value> = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::GraphQl(vec![format!("malformed response envelope: {}", e)]))?;

    if !envelope.errors.is_empty() {
        let messages = envelope.errors.into_iter().map(|e| e.message).collect();
        return Err(ApiError::GraphQl(messages));
    }

    match envelope.data {
        None | Some(Value::Null) => Err(ApiError::NoData(None)),
        Some(data) => serde_json::from_value(data).map_err(|e| ApiError::NoData(Some(e.to_string()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resilience::backoff::MAX_JITTER_MS;
    use crate::shopify::transport::testing::{respond, throttled, ScriptedTransport};
    use crate::shopify::transport::TransportError;
    use reqwest::StatusCode;
    use serde::Deserialize;
    use serde_json::json;
    use std::time::Duration;
    use tokio::time::Instant;

    #[derive(Debug, Deserialize)]
    struct ShopData {
        shop: Shop,
    }

    #[derive(Debug, Deserialize)]
    struct Shop {
        name: String,
    }

    fn test_config() -> ShopifyConfig {
        ShopifyConfig {
            access_token: Some("shpat_test".to_string()),
            store_domain: Some("demo.myshopify.com".to_string()),
            api_version: "2024-10".to_string(),
            request_timeout: Duration::from_secs(5),
        }
    }

    fn client(transport: &Arc<ScriptedTransport>) -> ShopifyClient {
        ShopifyClient::with_transport(test_config(), transport.clone())
    }

    fn shop_ok() -> Result<UpstreamResponse, TransportError> {
        respond(200, json!({ "data": { "shop": { "name": "Demo" } } }))
    }

    #[tokio::test]
    async fn test_success_first_attempt() {
        let transport = Arc::new(ScriptedTransport::new(vec![shop_ok()]));
        let data: ShopData = client(&transport)
            .execute("{ shop { name } }", json!({}))
            .await
            .unwrap();

        assert_eq!(data.shop.name, "Demo");
        assert_eq!(transport.calls(), 1);
        assert_eq!(transport.requests()[0].query, "{ shop { name } }");
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_after_max_retries() {
        let transport = Arc::new(ScriptedTransport::new(vec![throttled(None)]));
        let started = Instant::now();

        let err = client(&transport)
            .execute::<Value>("{ shop { name } }", json!({}))
            .await
            .unwrap_err();

        assert_eq!(transport.calls(), (MAX_RETRIES + 1) as usize);
        match err {
            ApiError::RateLimitExhausted { status, attempts } => {
                assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
                assert_eq!(attempts, 4);
            }
            other => panic!("expected rate limit exhaustion, got {:?}", other),
        }

        // 2000 + 4000 + 8000 ms of base wait, three jitters on top
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(14_000));
        assert!(elapsed < Duration::from_millis(14_000 + 3 * MAX_JITTER_MS));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_after_sets_first_wait() {
        let transport = Arc::new(ScriptedTransport::new(vec![throttled(Some(5)), shop_ok()]));
        let started = Instant::now();

        let data: ShopData = client(&transport)
            .execute("{ shop { name } }", json!({}))
            .await
            .unwrap();

        let elapsed = started.elapsed();
        assert_eq!(data.shop.name, "Demo");
        assert_eq!(transport.calls(), 2);
        assert!(elapsed >= Duration::from_millis(5000));
        assert!(elapsed < Duration::from_millis(5000 + MAX_JITTER_MS));
    }

    #[tokio::test(start_paused = true)]
    async fn test_resubmits_identical_request() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            throttled(Some(1)),
            throttled(Some(1)),
            shop_ok(),
        ]));

        let _: ShopData = client(&transport)
            .execute("query($n: Int) { shop { name } }", json!({ "n": 3 }))
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        assert!(requests.iter().all(|r| r == &requests[0]));
    }

    #[tokio::test]
    async fn test_missing_token_makes_no_call() {
        let transport = Arc::new(ScriptedTransport::new(vec![shop_ok()]));
        let mut config = test_config();
        config.access_token = None;
        let client = ShopifyClient::with_transport(config, transport.clone());

        let err = client.execute::<Value>("{ shop { name } }", json!({})).await.unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_transport_error_not_retried() {
        let transport = Arc::new(ScriptedTransport::new(vec![Err(TransportError::Connect(
            "connection refused".into(),
        ))]));

        let err = client(&transport)
            .execute::<Value>("{ shop { name } }", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(TransportError::Connect(_))));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_http_error_not_retried() {
        let transport = Arc::new(ScriptedTransport::new(vec![respond(503, json!({}))]));

        let err = client(&transport)
            .execute::<Value>("{ shop { name } }", json!({}))
            .await
            .unwrap_err();
        match err {
            ApiError::Http { status, status_text } => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(status_text, "Service Unavailable");
            }
            other => panic!("expected HTTP error, got {:?}", other),
        }
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_graphql_errors_on_success_status() {
        let transport = Arc::new(ScriptedTransport::new(vec![respond(
            200,
            json!({
                "data": { "shop": { "name": "Demo" } },
                "errors": [{ "message": "Access denied" }, { "message": "Field 'foo' doesn't exist" }]
            }),
        )]));

        let err = client(&transport)
            .execute::<ShopData>("{ shop { name foo } }", json!({}))
            .await
            .unwrap_err();
        match err {
            ApiError::GraphQl(messages) => {
                assert_eq!(messages, vec!["Access denied", "Field 'foo' doesn't exist"]);
            }
            other => panic!("expected GraphQL error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_data() {
        let transport = Arc::new(ScriptedTransport::new(vec![respond(200, json!({ "data": null }))]));
        let err = client(&transport)
            .execute::<ShopData>("{ shop { name } }", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NoData(None)));
    }

    #[tokio::test]
    async fn test_data_shape_mismatch() {
        let transport = Arc::new(ScriptedTransport::new(vec![respond(
            200,
            json!({ "data": { "shop": { "title": "Demo" } } }),
        )]));
        let err = client(&transport)
            .execute::<ShopData>("{ shop { name } }", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NoData(Some(_))));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(UpstreamResponse {
            status: StatusCode::OK,
            retry_after_secs: None,
            body: "<html>maintenance</html>".to_string(),
        })]));
        let err = client(&transport)
            .execute::<Value>("{ shop { name } }", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::GraphQl(ref m) if m[0].contains("malformed")));
    }
}
