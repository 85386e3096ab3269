// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Timeline post storage.
//!
//! The feed handler only sees the [`TimelineStore`] trait; the backing
//! data source is swappable. [`MemoryStore`] serves tests and local
//! development, a database-backed implementation slots in behind the
//! same trait for deployments.

use crate::validator::TimelineQuery;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

/// Downstream query failure, surfaced as HTTP 500. Distinct from
/// validation failures, which never reach the store.
#[derive(Debug, Error)]
#[error("timeline query failed: {0}")]
pub struct QueryError(pub String);

/// A geolocated timeline post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelinePost {
    pub id: u64,
    pub text: String,
    pub date: DateTime<Utc>,
    pub channel: String,
    pub channel_username: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location_name: Option<String>,
    pub country_code: Option<String>,
    pub has_photo: bool,
    pub has_video: bool,
    /// Entity ids referenced by the post, matched by the id filters
    #[serde(default)]
    pub location_ids: Vec<u64>,
    #[serde(default)]
    pub person_ids: Vec<u64>,
    #[serde(default)]
    pub policy_ids: Vec<u64>,
    #[serde(default)]
    pub group_ids: Vec<u64>,
    /// Person names mentioned by the post, matched by the name filter
    #[serde(default)]
    pub person_names: Vec<String>,
}

/// One page of timeline results.
#[derive(Debug, Clone)]
pub struct TimelinePage {
    pub posts: Vec<TimelinePost>,
    pub total: u64,
    pub has_more: bool,
}

/// Data source for timeline posts.
#[async_trait]
pub trait TimelineStore: Send + Sync {
    /// Fetch the page of posts matching a validated query, newest first.
    async fn fetch_posts(&self, query: &TimelineQuery) -> Result<TimelinePage, QueryError>;
}

/// In-memory timeline store.
#[derive(Default)]
pub struct MemoryStore {
    posts: RwLock<Vec<TimelinePost>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, post: TimelinePost) {
        self.posts.write().await.push(post);
    }
}

#[async_trait]
impl TimelineStore for MemoryStore {
    async fn fetch_posts(&self, query: &TimelineQuery) -> Result<TimelinePage, QueryError> {
        let posts = self.posts.read().await;
        let mut matched: Vec<&TimelinePost> =
            posts.iter().filter(|post| matches(post, query)).collect();
        matched.sort_by(|a, b| b.date.cmp(&a.date));

        let total = matched.len();
        let offset = (query.pagination.page as usize - 1) * query.pagination.limit as usize;
        let page: Vec<TimelinePost> = matched
            .into_iter()
            .skip(offset)
            .take(query.pagination.limit as usize)
            .cloned()
            .collect();
        let has_more = offset + page.len() < total;

        Ok(TimelinePage {
            posts: page,
            total: total as u64,
            has_more,
        })
    }
}

fn matches(post: &TimelinePost, query: &TimelineQuery) -> bool {
    let range = &query.date_range;
    if post.date < range.start_date || post.date > range.end_date {
        return false;
    }

    let filters = &query.filters;
    if let Some(id) = filters.location_id {
        if !post.location_ids.contains(&id) {
            return false;
        }
    }
    if let Some(id) = filters.person_id {
        if !post.person_ids.contains(&id) {
            return false;
        }
    }
    if let Some(id) = filters.policy_id {
        if !post.policy_ids.contains(&id) {
            return false;
        }
    }
    if let Some(id) = filters.group_id {
        if !post.group_ids.contains(&id) {
            return false;
        }
    }
    if let Some(name) = &filters.location_name {
        match &post.location_name {
            Some(location) if location.eq_ignore_ascii_case(name) => {}
            _ => return false,
        }
    }
    if let Some(name) = &filters.person_name {
        if !post
            .person_names
            .iter()
            .any(|person| person.eq_ignore_ascii_case(name))
        {
            return false;
        }
    }
    if let Some(channel) = &filters.channel {
        if post.channel_username != *channel && post.channel != *channel {
            return false;
        }
    }

    true
}
