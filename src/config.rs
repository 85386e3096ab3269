// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the timeline ingress service.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the timeline ingress service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Query validation configuration
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Fixed-window rate limit configuration for the checkout endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests per window per client (default: 5)
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Window length in milliseconds (default: 900000, i.e. 15 minutes)
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,

    /// Interval between sweeps of expired entries in seconds (default: 300)
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

/// Validation configuration for timeline queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Maximum allowed date range in days (default: 365)
    #[serde(default = "default_max_range_days")]
    pub max_range_days: i64,

    /// Maximum page size; larger values are clamped (default: 100)
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,

    /// Page size when the client supplies none (default: 20)
    #[serde(default = "default_limit")]
    pub default_limit: u32,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_max_requests() -> u32 {
    5 // Checkout endpoint policy: 5 requests per window
}

fn default_window_ms() -> u64 {
    900_000 // 15 minutes
}

fn default_sweep_interval_secs() -> u64 {
    300 // 5 minutes
}

fn default_max_range_days() -> i64 {
    365
}

fn default_max_limit() -> u32 {
    100
}

fn default_limit() -> u32 {
    20
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            rate_limit: RateLimitConfig::default(),
            validation: ValidationConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_ms: default_window_ms(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_range_days: default_max_range_days(),
            max_limit: default_max_limit(),
            default_limit: default_limit(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl RateLimitConfig {
    /// Get the window length
    pub fn window_duration(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.window_ms as i64)
    }

    /// Get the sweep interval
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}
