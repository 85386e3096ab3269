// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Timeline ingress service binary.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use timeline_ingress::{
    config::{Config, RateLimitConfig},
    handlers::{router, AppState},
    limiter::RateLimiter,
    metrics::Metrics,
    store::MemoryStore,
    validator::TimelineValidator,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let config = load_config();
    info!(
        bind_addr = %config.bind_addr,
        max_requests = config.rate_limit.max_requests,
        window_ms = config.rate_limit.window_ms,
        sweep_interval_secs = config.rate_limit.sweep_interval_secs,
        "Starting timeline ingress"
    );

    // Create application state
    let state = Arc::new(AppState {
        validator: TimelineValidator::new(config.validation.clone()),
        limiter: RateLimiter::new(config.rate_limit.clone()),
        store: Arc::new(MemoryStore::new()),
        metrics: Metrics::new()?,
        config: config.clone(),
    });

    // Spawn the expired-entry sweep task
    let sweep_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_state.config.rate_limit.sweep_interval());
        loop {
            interval.tick().await;
            let removed = sweep_state.limiter.sweep().await;
            if removed > 0 {
                debug!(removed, "Swept expired rate limit entries");
            }
            sweep_state
                .metrics
                .rate_limit_entries
                .set(sweep_state.limiter.entry_count().await as i64);
        }
    });

    // Build router and start server
    let app = router(state);
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Load configuration from environment variables.
fn load_config() -> Config {
    Config {
        bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
        rate_limit: RateLimitConfig {
            max_requests: std::env::var("MAX_REQUESTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            window_ms: std::env::var("WINDOW_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(900_000),
            sweep_interval_secs: std::env::var("SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
        },
        ..Default::default()
    }
}
