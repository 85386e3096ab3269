// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Deterministic traffic generators for abuse simulation.

use timeline_ingress::validator::RawTimelineParams;

/// Generate distinct client identities (documentation-range addresses).
pub fn generate_clients(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("203.0.{}.{}", i / 250, i % 250 + 1))
        .collect()
}

/// A valid timeline query, varied by index across month windows.
pub fn valid_params(index: usize) -> RawTimelineParams {
    let month = index % 12 + 1;
    let mut params = RawTimelineParams {
        start_date: Some(format!("2024-{month:02}-01")),
        end_date: Some(format!("2024-{month:02}-15")),
        ..Default::default()
    };
    // Exercise optional fields on part of the traffic
    match index % 5 {
        1 => params.page = Some("2".to_string()),
        2 => params.limit = Some("50".to_string()),
        3 => params.channel = Some("field_reports".to_string()),
        4 => params.location_id = Some("7".to_string()),
        _ => {}
    }
    params
}

/// A malformed timeline query, cycling through the rejection classes.
pub fn malformed_params(index: usize) -> RawTimelineParams {
    let mut params = RawTimelineParams {
        start_date: Some("2024-01-01".to_string()),
        end_date: Some("2024-01-15".to_string()),
        ..Default::default()
    };
    match index % 8 {
        0 => params.start_date = None,
        1 => params.end_date = None,
        2 => params.start_date = Some("not-a-date".to_string()),
        3 => {
            // Inverted range
            params.start_date = Some("2024-02-01".to_string());
            params.end_date = Some("2024-01-01".to_string());
        }
        4 => {
            // Oversized range
            params.start_date = Some("2023-01-01".to_string());
            params.end_date = Some("2024-06-01".to_string());
        }
        5 => params.person_id = Some("-1".to_string()),
        6 => params.page = Some("0".to_string()),
        _ => params.limit = Some("abc".to_string()),
    }
    params
}

/// Deterministic biased pick based on index and ratio.
pub fn biased(ratio: f64, index: usize) -> bool {
    if ratio >= 1.0 {
        true
    } else if ratio <= 0.0 {
        false
    } else {
        (index as f64 * 0.618033988749895) % 1.0 < ratio
    }
}
