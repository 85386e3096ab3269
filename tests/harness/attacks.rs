// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Abuse traffic patterns for security testing.

/// Traffic pattern configuration.
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Total number of requests to send
    pub total_requests: usize,
    /// Number of unique client identities to simulate
    pub unique_clients: usize,
    /// Fraction of requests with malformed query parameters (0.0-1.0)
    pub malformed_ratio: f64,
    /// Rate limit quota per client per window
    pub max_requests: u32,
    /// Rate limit window in milliseconds
    pub window_ms: u64,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            total_requests: 100,
            unique_clients: 1,
            malformed_ratio: 0.0,
            max_requests: 5,
            window_ms: 900_000,
        }
    }
}

/// Predefined traffic patterns.
impl AttackConfig {
    /// Single client flood - basic DoS from one identity.
    pub fn single_client_flood() -> Self {
        Self {
            total_requests: 200,
            unique_clients: 1,
            ..Default::default()
        }
    }

    /// Distributed flood - many identities, each over quota.
    pub fn distributed_flood() -> Self {
        Self {
            total_requests: 1000,
            unique_clients: 100,
            ..Default::default()
        }
    }

    /// Malformed-parameter probe - every request fails validation.
    pub fn malformed_params_probe() -> Self {
        Self {
            total_requests: 80,
            unique_clients: 5,
            malformed_ratio: 1.0,
            ..Default::default()
        }
    }

    /// Mixed traffic - mostly valid requests with some garbage.
    pub fn mixed_traffic() -> Self {
        Self {
            total_requests: 200,
            unique_clients: 20,
            malformed_ratio: 0.3,
            ..Default::default()
        }
    }

    /// Under-limit drip - every client stays inside its quota.
    pub fn under_limit_drip() -> Self {
        Self {
            total_requests: 100,
            unique_clients: 25,
            ..Default::default()
        }
    }

    /// Upper bound on requests the limiter can admit for this pattern.
    pub fn admissible_ceiling(&self) -> usize {
        self.unique_clients * self.max_requests as usize
    }
}
