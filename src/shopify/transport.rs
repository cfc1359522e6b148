//! HTTP transport for GraphQL requests.
//!
//! # Responsibilities
//! - POST a GraphQL document with the access token header
//! - Report status, `Retry-After` and raw body back to the client
//! - Translate network failures into [`TransportError`]
//!
//! The client only talks to the [`GraphqlTransport`] trait so tests can swap
//! in a scripted double.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;
use url::Url;

/// Header carrying the Admin API access token.
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// JSON body of a GraphQL request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GraphqlRequest {
    pub query: String,
    pub variables: serde_json::Value,
}

/// Raw upstream response, before envelope decoding.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    /// `Retry-After` in seconds, when present and numeric.
    pub retry_after_secs: Option<u64>,
    pub body: String,
}

/// Network-level failures. These are surfaced, never retried.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

/// Sends one GraphQL POST and returns whatever the upstream answered.
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    async fn post(
        &self,
        endpoint: &Url,
        access_token: &str,
        request: &GraphqlRequest,
    ) -> Result<UpstreamResponse, TransportError>;
}

/// Production transport backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("storefront-guard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Other(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl GraphqlTransport for ReqwestTransport {
    async fn post(
        &self,
        endpoint: &Url,
        access_token: &str,
        request: &GraphqlRequest,
    ) -> Result<UpstreamResponse, TransportError> {
        let response = self
            .client
            .post(endpoint.clone())
            .header(ACCESS_TOKEN_HEADER, access_token)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let retry_after_secs = parse_retry_after(response.headers());
        let body = response.text().await?;

        Ok(UpstreamResponse {
            status,
            retry_after_secs,
            body,
        })
    }
}

/// Parse `Retry-After` as seconds.
///
/// Fractional values keep their whole-second part (`1.5` → 1). HTTP-date
/// values are ignored and the caller falls back to its default delay.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<u64> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();
    let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
    if !fraction.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    whole.parse::<u64>().ok()
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// Replays a fixed script of responses. The last entry repeats forever.
    pub(crate) struct ScriptedTransport {
        script: Mutex<VecDeque<Result<UpstreamResponse, TransportError>>>,
        requests: Mutex<Vec<GraphqlRequest>>,
        calls: AtomicUsize,
    }

    impl ScriptedTransport {
        pub(crate) fn new(script: Vec<Result<UpstreamResponse, TransportError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                requests: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub(crate) fn requests(&self) -> Vec<GraphqlRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GraphqlTransport for ScriptedTransport {
        async fn post(
            &self,
            _endpoint: &Url,
            _access_token: &str,
            request: &GraphqlRequest,
        ) -> Result<UpstreamResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            let mut script = self.script.lock().unwrap();
            if script.len() > 1 {
                script.pop_front().expect("script is non-empty")
            } else {
                script.front().cloned().expect("transport script is empty")
            }
        }
    }

    pub(crate) fn respond(status: u16, body: serde_json::Value) -> Result<UpstreamResponse, TransportError> {
        Ok(UpstreamResponse {
            status: StatusCode::from_u16(status).unwrap(),
            retry_after_secs: None,
            body: body.to_string(),
        })
    }

    pub(crate) fn throttled(retry_after_secs: Option<u64>) -> Result<UpstreamResponse, TransportError> {
        Ok(UpstreamResponse {
            status: StatusCode::TOO_MANY_REQUESTS,
            retry_after_secs,
            body: r#"{"errors":[{"message":"Throttled"}]}"#.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_parse_retry_after() {
        let mut headers = HeaderMap::new();
        assert_eq!(parse_retry_after(&headers), None);

        headers.insert(RETRY_AFTER, HeaderValue::from_static("5"));
        assert_eq!(parse_retry_after(&headers), Some(5));

        headers.insert(RETRY_AFTER, HeaderValue::from_static("1.5"));
        assert_eq!(parse_retry_after(&headers), Some(1));

        headers.insert(RETRY_AFTER, HeaderValue::from_static("0.25"));
        assert_eq!(parse_retry_after(&headers), Some(0));

        headers.insert(RETRY_AFTER, HeaderValue::from_static("2.x"));
        assert_eq!(parse_retry_after(&headers), None);

        headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));
        assert_eq!(parse_retry_after(&headers), None);
    }

    #[test]
    fn test_request_body_shape() {
        let request = GraphqlRequest {
            query: "{ shop { name } }".to_string(),
            variables: serde_json::json!({ "first": 10 }),
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["query"], "{ shop { name } }");
        assert_eq!(body["variables"]["first"], 10);
    }
}
