//! Response construction for rejections and upstream failures.

use axum::{
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::security::RateLimitDecision;
use crate::shopify::ApiError;

pub const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
pub const X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

/// Seconds a caller should wait after the upstream retries ran out.
pub const UPSTREAM_BACKOFF_SECS: u64 = 60;

/// 429 response carrying retry timing hints.
pub fn too_many_requests(decision: &RateLimitDecision) -> Response {
    let retry_after = decision.reset_in_secs();
    let mut response = (
        StatusCode::TOO_MANY_REQUESTS,
        Json(json!({
            "error": "Too many requests. Please try again later.",
            "retryAfter": retry_after,
        })),
    )
        .into_response();

    let headers = response.headers_mut();
    headers.insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
    headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(0u32));
    headers.insert(X_RATELIMIT_RESET, HeaderValue::from(retry_after));
    response
}

impl ApiError {
    /// Status returned to our own callers for this upstream failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::RateLimitExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Transport(_)
            | ApiError::Http { .. }
            | ApiError::GraphQl(_)
            | ApiError::NoData(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        tracing::error!(error = %self, status = %status, "Upstream request failed");

        let mut response = (status, Json(json!({ "error": self.to_string() }))).into_response();
        if matches!(self, ApiError::RateLimitExhausted { .. }) {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(UPSTREAM_BACKOFF_SECS));
        }
        response
    }
}
