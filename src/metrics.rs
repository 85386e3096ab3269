// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus metrics for the ingress service.

use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};

/// Counters and gauges for the ingress, backed by a private registry.
pub struct Metrics {
    registry: Registry,
    /// Timeline feed requests received
    pub timeline_requests: IntCounter,
    /// Timeline requests rejected by validation
    pub validation_failures: IntCounter,
    /// Checkout requests received
    pub checkout_requests: IntCounter,
    /// Checkout requests denied by the rate limiter
    pub rate_limited: IntCounter,
    /// Live rate limit entries, updated on sweep and scrape
    pub rate_limit_entries: IntGauge,
}

impl Metrics {
    /// Create and register all collectors. Registration only fails on
    /// duplicate names, so an error here is a startup bug.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let timeline_requests = IntCounter::new(
            "timeline_requests_total",
            "Timeline feed requests received",
        )?;
        let validation_failures = IntCounter::new(
            "timeline_validation_failures_total",
            "Timeline requests rejected by validation",
        )?;
        let checkout_requests = IntCounter::new(
            "checkout_requests_total",
            "Checkout requests received",
        )?;
        let rate_limited = IntCounter::new(
            "checkout_rate_limited_total",
            "Checkout requests denied by the rate limiter",
        )?;
        let rate_limit_entries = IntGauge::new(
            "rate_limit_entries",
            "Live entries in the rate limit store",
        )?;

        registry.register(Box::new(timeline_requests.clone()))?;
        registry.register(Box::new(validation_failures.clone()))?;
        registry.register(Box::new(checkout_requests.clone()))?;
        registry.register(Box::new(rate_limited.clone()))?;
        registry.register(Box::new(rate_limit_entries.clone()))?;

        Ok(Self {
            registry,
            timeline_requests,
            validation_failures,
            checkout_requests,
            rate_limited,
            rate_limit_entries,
        })
    }

    /// Render the registry in the Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
