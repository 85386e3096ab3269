// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the timeline ingress service.
//!
//! The ingress sits in front of two opaque upstreams: the timeline data
//! source (behind [`TimelineStore`]) and the payment provider. Requests
//! are validated and rate-limited here; validation failures never reach
//! the data layer.

use crate::config::Config;
use crate::limiter::{client_identifier, RateLimitDecision, RateLimiter};
use crate::metrics::Metrics;
use crate::store::{TimelinePost, TimelineStore};
use crate::validator::{RawTimelineParams, TimelineValidator};
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

/// Shared application state.
pub struct AppState {
    pub validator: TimelineValidator,
    pub limiter: RateLimiter,
    pub store: Arc<dyn TimelineStore>,
    pub metrics: Metrics,
    pub config: Config,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
}

/// Timeline feed response body.
#[derive(Debug, Serialize)]
pub struct TimelineResponse {
    pub status: &'static str,
    pub posts: Vec<TimelinePost>,
    pub count: usize,
    #[serde(rename = "hasMore")]
    pub has_more: bool,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

/// Checkout request body.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    /// Donation amount in cents
    #[serde(default)]
    pub amount: Option<i64>,
}

/// Checkout guard response body.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub status: &'static str,
    pub amount: i64,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Build the service router shared by the binary and the tests.
pub fn router(state: Arc<AppState>) -> Router {
    let metrics_path = state.config.metrics.path.clone();
    let mut router = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/api/timeline", get(timeline))
        .route("/api/donations/checkout", post(checkout));
    if state.config.metrics.enabled {
        router = router.route(&metrics_path, get(metrics));
    }
    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "timeline-ingress",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Timeline feed endpoint.
///
/// Validates the query string, then fetches one page of posts from the
/// store. Exactly one error kind maps to 400; everything downstream is a
/// 500 with a generic message plus detail.
pub async fn timeline(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RawTimelineParams>,
) -> Response {
    state.metrics.timeline_requests.inc();

    let query = match state.validator.validate(&params) {
        Ok(query) => query,
        Err(err) => {
            state.metrics.validation_failures.inc();
            info!(error = %err, "Timeline validation failed");
            return error_response(StatusCode::BAD_REQUEST, err.to_string(), None);
        }
    };

    match state.store.fetch_posts(&query).await {
        Ok(page) => {
            debug!(
                count = page.posts.len(),
                total = page.total,
                page = query.pagination.page,
                "Timeline page served"
            );
            let body = TimelineResponse {
                status: "success",
                count: page.posts.len(),
                posts: page.posts,
                has_more: page.has_more,
                page: query.pagination.page,
                limit: query.pagination.limit,
                total: page.total,
            };
            (StatusCode::OK, no_cache_headers(), Json(body)).into_response()
        }
        Err(err) => {
            warn!(error = %err, "Timeline query failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database query failed".to_string(),
                Some(err.to_string()),
            )
        }
    }
}

/// Checkout guard endpoint.
///
/// Rate-limits by client identity before anything else, then validates
/// the donation amount. Session creation happens upstream at the payment
/// provider; an allowed response tells the caller to proceed.
pub async fn checkout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<CheckoutRequest>,
) -> Response {
    state.metrics.checkout_requests.inc();

    let identifier = client_identifier(&headers);
    let decision = state.limiter.check(&identifier).await;
    if !decision.allowed {
        state.metrics.rate_limited.inc();
        let retry_after = retry_after_secs(&decision, &state.limiter);
        info!(
            identifier,
            retry_after_secs = retry_after,
            "Checkout request rate limited"
        );
        return (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, retry_after.to_string())],
            Json(ErrorResponse {
                status: "error",
                message: "Too many requests. Try again later.".to_string(),
                error: None,
                retry_after_secs: Some(retry_after),
            }),
        )
            .into_response();
    }

    match request.amount {
        Some(amount) if amount > 0 => {
            debug!(identifier, amount, remaining = decision.remaining, "Checkout allowed");
            (
                StatusCode::OK,
                [("x-ratelimit-remaining", decision.remaining.to_string())],
                Json(CheckoutResponse {
                    status: "success",
                    amount,
                }),
            )
                .into_response()
        }
        _ => error_response(
            StatusCode::BAD_REQUEST,
            "Please enter a valid amount".to_string(),
            None,
        ),
    }
}

/// Prometheus metrics endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    state
        .metrics
        .rate_limit_entries
        .set(state.limiter.entry_count().await as i64);

    match state.metrics.render() {
        Ok(body) => (StatusCode::OK, body).into_response(),
        Err(err) => {
            warn!(error = %err, "Metrics encoding failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Whole seconds until the window resets, rounded up.
fn retry_after_secs(decision: &RateLimitDecision, limiter: &RateLimiter) -> u64 {
    let millis = (decision.reset_time - limiter.now()).num_milliseconds().max(0);
    ((millis + 999) / 1000) as u64
}

fn no_cache_headers() -> [(header::HeaderName, &'static str); 3] {
    [
        (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
        (header::PRAGMA, "no-cache"),
        (header::EXPIRES, "0"),
    ]
}

fn error_response(status: StatusCode, message: String, error: Option<String>) -> Response {
    (
        status,
        no_cache_headers(),
        Json(ErrorResponse {
            status: "error",
            message,
            error,
            retry_after_secs: None,
        }),
    )
        .into_response()
}
