// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fixed-window rate limiter for the checkout endpoint.
//!
//! Counts requests per client identifier in fixed windows, entirely in
//! process memory. State is lost on restart and is not shared across
//! instances; both are accepted limitations of this design, as is the
//! shared "unknown" bucket for clients with no usable address header.

use crate::config::RateLimitConfig;
use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Identifier assigned to clients with no recognizable address header.
/// All such clients share a single rate-limit bucket.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Clock source for the limiter. Production uses `Utc::now`; tests
/// inject a controllable clock to advance windows deterministically.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Per-identifier window state.
#[derive(Debug, Clone)]
struct RateLimitEntry {
    /// Requests counted in the current window
    count: u32,
    /// When the current window ends
    reset_time: DateTime<Utc>,
}

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// Whether the request may proceed
    pub allowed: bool,
    /// Requests left in the current window
    pub remaining: u32,
    /// When the current window ends
    pub reset_time: DateTime<Utc>,
}

/// Thread-safe fixed-window rate limiter.
pub struct RateLimiter {
    config: RateLimitConfig,
    entries: RwLock<HashMap<String, RateLimitEntry>>,
    clock: Clock,
}

impl RateLimiter {
    /// Create a new rate limiter using the wall clock.
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(Utc::now))
    }

    /// Create a rate limiter with an injected clock.
    pub fn with_clock(config: RateLimitConfig, clock: Clock) -> Self {
        Self {
            config,
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// The limiter's current time.
    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Check whether a request from `identifier` may proceed, counting it
    /// if so.
    ///
    /// The write guard is held across the whole read-compare-write
    /// sequence, so `count` never exceeds `max_requests` under concurrent
    /// access. A denied call leaves the entry untouched: the counter is
    /// not incremented and the window is not extended.
    pub async fn check(&self, identifier: &str) -> RateLimitDecision {
        let now = self.now();
        let mut entries = self.entries.write().await;

        match entries.get_mut(identifier) {
            Some(entry) if entry.reset_time >= now => {
                if entry.count >= self.config.max_requests {
                    debug!(
                        identifier,
                        reset_time = %entry.reset_time,
                        "Rate limit exceeded"
                    );
                    RateLimitDecision {
                        allowed: false,
                        remaining: 0,
                        reset_time: entry.reset_time,
                    }
                } else {
                    entry.count += 1;
                    RateLimitDecision {
                        allowed: true,
                        remaining: self.config.max_requests - entry.count,
                        reset_time: entry.reset_time,
                    }
                }
            }
            // No entry, or the stored window has already ended
            _ => {
                let reset_time = now + self.config.window_duration();
                entries.insert(
                    identifier.to_string(),
                    RateLimitEntry {
                        count: 1,
                        reset_time,
                    },
                );
                RateLimitDecision {
                    allowed: true,
                    remaining: self.config.max_requests.saturating_sub(1),
                    reset_time,
                }
            }
        }
    }

    /// Remove entries whose window has ended. Returns how many were
    /// removed. Driven by a periodic task in the binary; callable
    /// directly in tests.
    pub async fn sweep(&self) -> usize {
        let now = self.now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.reset_time >= now);
        before - entries.len()
    }

    /// Number of live entries, expired or not.
    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }
}

/// Derive a client identifier from request headers.
///
/// Priority order is a policy decision: the Cloudflare originating-IP
/// header is trusted first, then the generic real-IP header, then the
/// first address of the forwarded-for list, then the shared
/// [`UNKNOWN_CLIENT`] sentinel.
pub fn client_identifier(headers: &HeaderMap) -> String {
    if let Some(ip) = header_str(headers, "cf-connecting-ip") {
        return ip.to_string();
    }
    if let Some(ip) = header_str(headers, "x-real-ip") {
        return ip.to_string();
    }
    if let Some(forwarded) = header_str(headers, "x-forwarded-for") {
        // x-forwarded-for can list several addresses; take the first
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }
    UNKNOWN_CLIENT.to_string()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
