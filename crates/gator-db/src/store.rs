//! [`FeedStore`] backed by a Postgres pool.

use chrono::{DateTime, Utc};
use gator_core::{Feed, FeedStore, NewPost, StoreError};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

#[derive(Debug, Clone)]
pub struct PgFeedStore {
    pool: PgPool,
}

impl PgFeedStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::DuplicatePostUrl(url) => StoreError::DuplicateUrl(url),
            other => StoreError::Backend(Box::new(other)),
        }
    }
}

impl FeedStore for PgFeedStore {
    async fn next_feed_to_fetch(&self) -> Result<Feed, StoreError> {
        match crate::next_feed_to_fetch(&self.pool).await {
            Ok(row) => Ok(row.into()),
            Err(DbError::NotFound) => Err(StoreError::NoFeeds),
            Err(e) => Err(e.into()),
        }
    }

    async fn mark_feed_fetched(
        &self,
        feed_id: Uuid,
        fetched_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        crate::mark_feed_fetched(&self.pool, feed_id, fetched_at)
            .await
            .map_err(StoreError::from)
    }

    async fn insert_post(&self, post: &NewPost) -> Result<(), StoreError> {
        crate::insert_post(&self.pool, post)
            .await
            .map(|_| ())
            .map_err(StoreError::from)
    }
}
