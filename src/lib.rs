// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Timeline Ingress
//!
//! Query validation and rate limiting in front of the timeline feed API:
//!
//! - Timeline query validation: required date range (strictly ordered,
//!   capped at one year), positive-integer entity id filters, pagination
//!   normalization. One error kind, one HTTP status (400).
//! - Fixed-window rate limiting for the checkout endpoint, keyed by
//!   client identity derived from proxy headers, with a periodic sweep
//!   of expired windows.
//!
//! The data source behind the feed and the payment provider behind the
//! checkout are opaque upstreams; this service only decides whether a
//! request is well-formed and within policy before they are reached.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `MAX_REQUESTS`: Max checkout requests per window per client (default: 5)
//! - `WINDOW_MS`: Rate limit window in milliseconds (default: 900000)
//! - `SWEEP_INTERVAL_SECS`: Expired-entry sweep period (default: 300)

pub mod config;
pub mod handlers;
pub mod limiter;
pub mod metrics;
pub mod store;
pub mod validator;

pub use config::Config;
pub use limiter::{client_identifier, RateLimitDecision, RateLimiter};
pub use store::{MemoryStore, TimelineStore};
pub use validator::{TimelineQuery, TimelineValidator, ValidationError};
