// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Timeline query validator.
//!
//! Converts the raw, untrusted query-string parameters of the timeline
//! feed endpoint into a well-formed [`TimelineQuery`], or fails with a
//! descriptive [`ValidationError`] before any data access happens:
//! - startDate/endDate presence, parseability, ordering, and range cap
//! - positive-integer entity id filters
//! - non-empty name and channel filters
//! - pagination normalization (page rejected when invalid, limit clamped)

use crate::config::ValidationConfig;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid {param}: {value}")]
    InvalidParameter { param: &'static str, value: String },

    #[error("startDate must be before endDate")]
    StartAfterEnd,

    #[error("Date range cannot exceed 1 year")]
    RangeTooLong,

    #[error("{0} cannot be empty")]
    EmptyParameter(&'static str),
}

/// Raw query parameters as they arrive on the wire.
///
/// Every field is optional at this layer; requiredness is enforced by
/// [`TimelineValidator::validate`], so the struct can be used directly as
/// an axum `Query` extractor without rejecting requests prematurely.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTimelineParams {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub location_id: Option<String>,
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub person_id: Option<String>,
    #[serde(default)]
    pub person_name: Option<String>,
    #[serde(default)]
    pub policy_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

/// Validated date range. `start_date` is strictly before `end_date`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Validated entity filters. Ids take precedence over names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimelineFilters {
    pub location_id: Option<u64>,
    pub location_name: Option<String>,
    pub person_id: Option<u64>,
    pub person_name: Option<String>,
    pub policy_id: Option<u64>,
    pub group_id: Option<u64>,
    pub channel: Option<String>,
}

/// Validated pagination. `page` is 1-indexed, `limit` is within 1..=max.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

/// A fully validated timeline query. Never constructed with an invalid
/// date range or a non-positive entity id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineQuery {
    pub date_range: DateRange,
    pub filters: TimelineFilters,
    pub pagination: Pagination,
}

/// Timeline query validator.
pub struct TimelineValidator {
    config: ValidationConfig,
}

impl TimelineValidator {
    /// Create a new validator with the given configuration.
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate raw query parameters into a [`TimelineQuery`].
    ///
    /// Pure function over its input: no side effects, no retries. A
    /// failure is terminal for the request.
    pub fn validate(&self, params: &RawTimelineParams) -> Result<TimelineQuery, ValidationError> {
        let date_range = self.validate_date_range(params)?;
        let filters = validate_filters(params)?;
        let pagination = self.validate_pagination(params)?;

        debug!(
            start_date = %date_range.start_date,
            end_date = %date_range.end_date,
            page = pagination.page,
            limit = pagination.limit,
            "Timeline query validated"
        );

        Ok(TimelineQuery {
            date_range,
            filters,
            pagination,
        })
    }

    fn validate_date_range(&self, params: &RawTimelineParams) -> Result<DateRange, ValidationError> {
        let start_raw = required(params.start_date.as_deref(), "startDate")?;
        let end_raw = required(params.end_date.as_deref(), "endDate")?;

        let start_date = parse_timestamp(start_raw).ok_or_else(|| ValidationError::InvalidParameter {
            param: "startDate",
            value: start_raw.to_string(),
        })?;
        let end_date = parse_timestamp(end_raw).ok_or_else(|| ValidationError::InvalidParameter {
            param: "endDate",
            value: end_raw.to_string(),
        })?;

        if start_date >= end_date {
            debug!(start = %start_date, end = %end_date, "Date range out of order");
            return Err(ValidationError::StartAfterEnd);
        }

        if end_date - start_date > chrono::Duration::days(self.config.max_range_days) {
            debug!(start = %start_date, end = %end_date, "Date range too long");
            return Err(ValidationError::RangeTooLong);
        }

        Ok(DateRange {
            start_date,
            end_date,
        })
    }

    fn validate_pagination(&self, params: &RawTimelineParams) -> Result<Pagination, ValidationError> {
        let page = match params.page.as_deref() {
            None => 1,
            Some(raw) => match raw.trim().parse::<i64>() {
                // page below 1 is rejected, not clamped
                Ok(page) if page >= 1 && page <= i64::from(u32::MAX) => page as u32,
                _ => {
                    return Err(ValidationError::InvalidParameter {
                        param: "page",
                        value: raw.to_string(),
                    })
                }
            },
        };

        let limit = match params.limit.as_deref() {
            None => self.config.default_limit,
            Some(raw) => match raw.trim().parse::<i64>() {
                // out-of-range limits are clamped, not rejected
                Ok(limit) => limit.clamp(1, self.config.max_limit as i64) as u32,
                Err(_) => {
                    return Err(ValidationError::InvalidParameter {
                        param: "limit",
                        value: raw.to_string(),
                    })
                }
            },
        };

        Ok(Pagination { page, limit })
    }
}

fn validate_filters(params: &RawTimelineParams) -> Result<TimelineFilters, ValidationError> {
    let mut filters = TimelineFilters::default();

    // Location filtering: id takes precedence over name
    if let Some(raw) = params.location_id.as_deref() {
        filters.location_id = Some(parse_entity_id("locationId", raw)?);
    } else if let Some(raw) = params.location_name.as_deref() {
        filters.location_name = Some(non_empty("locationName", raw)?);
    }

    // Person filtering: id takes precedence over name
    if let Some(raw) = params.person_id.as_deref() {
        filters.person_id = Some(parse_entity_id("personId", raw)?);
    } else if let Some(raw) = params.person_name.as_deref() {
        filters.person_name = Some(non_empty("personName", raw)?);
    }

    if let Some(raw) = params.policy_id.as_deref() {
        filters.policy_id = Some(parse_entity_id("policyId", raw)?);
    }
    if let Some(raw) = params.group_id.as_deref() {
        filters.group_id = Some(parse_entity_id("groupId", raw)?);
    }
    if let Some(raw) = params.channel.as_deref() {
        if raw.trim().is_empty() {
            return Err(ValidationError::EmptyParameter("channel"));
        }
        filters.channel = Some(raw.to_string());
    }

    Ok(filters)
}

fn required<'a>(value: Option<&'a str>, param: &'static str) -> Result<&'a str, ValidationError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ValidationError::MissingParameter(param))
}

fn non_empty(param: &'static str, raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyParameter(param));
    }
    Ok(trimmed.to_string())
}

fn parse_entity_id(param: &'static str, raw: &str) -> Result<u64, ValidationError> {
    match raw.trim().parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ValidationError::InvalidParameter {
            param,
            value: raw.to_string(),
        }),
    }
}

/// Parse a timestamp string. Accepts RFC 3339 timestamps and plain
/// `YYYY-MM-DD` dates (interpreted as midnight UTC).
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }
    None
}
