//! Client address extraction for rate limit identifiers.
//!
//! # Design Decisions
//! - Addresses come from proxy headers and are never authenticated
//! - They only serve as a coarse fairness key, never for access decisions

use axum::http::HeaderMap;

use crate::security::policy::RouteClass;

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const X_REAL_IP: &str = "x-real-ip";

/// Fallback key when no proxy header is present.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// First `X-Forwarded-For` entry, else `X-Real-IP`, else `"unknown"`.
pub fn client_address(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let real_ip = || {
        headers
            .get(X_REAL_IP)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    forwarded
        .or_else(real_ip)
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}

/// Limiter identifier: `<route-class>:<client-address>`.
pub fn rate_limit_key(class: RouteClass, headers: &HeaderMap) -> String {
    format!("{}:{}", class.as_str(), client_address(headers))
}
