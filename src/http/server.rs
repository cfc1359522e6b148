//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Guard each route with its rate limit class
//! - Start the rate limit sweeper alongside the server
//! - Serve until the shutdown signal fires

use axum::{
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::middleware::{rate_limit_middleware, RouteGuard};
use crate::observability::metrics;
use crate::security::{RateLimiter, RouteClass};
use crate::shopify::{ApiError, ShopifyClient};
use crate::sync::{self, DEFAULT_PAGE_SIZE};

/// Application state injected into handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub limiter: RateLimiter,
    pub shopify: ShopifyClient,
}

/// HTTP server for the admin dashboard core.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
    limiter: RateLimiter,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig, shopify: ShopifyClient) -> Self {
        let limiter = RateLimiter::new();
        let state = AppState {
            limiter: limiter.clone(),
            shopify,
        };
        let router = build_router(&config, state);
        Self {
            router,
            config,
            limiter,
        }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let sweeper = if self.config.rate_limit.enabled {
            Some(self.limiter.spawn_sweeper(
                Duration::from_secs(self.config.rate_limit.sweep_interval_secs),
                shutdown.resubscribe(),
            ))
        } else {
            None
        };

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        if let Some(handle) = sweeper {
            let _ = handle.await;
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &AppConfig, state: AppState) -> Router {
    let guarded = |router: Router<AppState>, class: RouteClass| {
        if config.rate_limit.enabled {
            router.route_layer(middleware::from_fn_with_state(
                RouteGuard::new(state.limiter.clone(), class),
                rate_limit_middleware,
            ))
        } else {
            router
        }
    };

    let read = guarded(Router::new().route("/api/shop", get(get_shop)), RouteClass::Read);
    let sync = guarded(
        Router::new().route("/api/sync/products", post(sync_products)),
        RouteClass::Sync,
    );

    Router::new()
        .route("/health", get(health))
        .merge(read)
        .merge(sync)
        .with_state(state)
        .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs)))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

async fn get_shop(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let result = sync::fetch_shop(&state.shopify).await;
    metrics::record_request("/api/shop", status_of(&result));
    Ok(Json(result?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SyncParams {
    page_size: Option<u32>,
}

async fn sync_products(
    State(state): State<AppState>,
    Query(params): Query<SyncParams>,
) -> Result<impl IntoResponse, ApiError> {
    let page_size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    let result = sync::fetch_all_products(&state.shopify, page_size).await;
    metrics::record_request("/api/sync/products", status_of(&result));
    let report = result?;

    tracing::info!(
        products = report.products.len(),
        pages = report.pages,
        truncated = report.truncated,
        "Product sync finished"
    );

    Ok(Json(json!({
        "synced": report.products.len(),
        "pages": report.pages,
        "truncated": report.truncated,
        "products": report.products,
    })))
}

fn status_of<T>(result: &Result<T, ApiError>) -> u16 {
    match result {
        Ok(_) => StatusCode::OK.as_u16(),
        Err(e) => e.status_code().as_u16(),
    }
}
