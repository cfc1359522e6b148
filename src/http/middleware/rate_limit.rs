//! Rate limiting middleware per route class.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::http::response::too_many_requests;
use crate::observability::metrics;
use crate::security::{rate_limit_key, RateLimiter, RouteClass};

/// Middleware state: the shared limiter plus the class guarding this route.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    pub limiter: RateLimiter,
    pub class: RouteClass,
}

impl RouteGuard {
    pub fn new(limiter: RateLimiter, class: RouteClass) -> Self {
        Self { limiter, class }
    }
}

pub async fn rate_limit_middleware(
    State(guard): State<RouteGuard>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = rate_limit_key(guard.class, request.headers());
    let decision = guard.limiter.check(&key, &guard.class.policy());

    if decision.admitted {
        return next.run(request).await;
    }

    tracing::warn!(
        client = %key,
        class = %guard.class,
        reset_in_ms = decision.reset_in.as_millis() as u64,
        "Rate limit exceeded"
    );
    metrics::record_rate_limited(guard.class.as_str());
    too_many_requests(&decision)
}
