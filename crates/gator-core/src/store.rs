//! The storage contract consumed by the ingestion pipeline.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A subscribed RSS source with its fetch bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_fetched_at: Option<DateTime<Utc>>,
}

/// A post ready to be inserted, built from one feed item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub published_at: DateTime<Utc>,
    pub feed_id: Uuid,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no feeds to fetch")]
    NoFeeds,

    /// A post with this URL is already stored.
    #[error("post already stored for url {0}")]
    DuplicateUrl(String),

    #[error(transparent)]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

/// Persistence operations the ingestion cycle depends on.
///
/// Each call is expected to be individually atomic; callers never group them
/// into a transaction.
pub trait FeedStore: Send + Sync {
    /// Returns a never-fetched feed if one exists, otherwise the feed fetched
    /// longest ago. Ties are broken by feed id.
    fn next_feed_to_fetch(&self) -> impl Future<Output = Result<Feed, StoreError>> + Send;

    fn mark_feed_fetched(
        &self,
        feed_id: Uuid,
        fetched_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Inserts a post, failing with [`StoreError::DuplicateUrl`] when the URL
    /// is already present.
    fn insert_post(&self, post: &NewPost) -> impl Future<Output = Result<(), StoreError>> + Send;
}
