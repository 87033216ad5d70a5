//! Database operations for `feed_follows`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// Name of the unique constraint on `feed_follows (user_id, feed_id)`.
pub const FEED_FOLLOWS_USER_FEED_KEY: &str = "feed_follows_user_feed_key";

/// A follow joined with the user and feed names it links.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FeedFollowRow {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub feed_id: Uuid,
    pub user_name: String,
    pub feed_name: String,
}

/// Makes `user_id` follow `feed_id`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails, including a unique
/// violation on `feed_follows_user_feed_key` for a repeated follow.
pub async fn create_feed_follow(
    pool: &PgPool,
    user_id: Uuid,
    feed_id: Uuid,
) -> Result<FeedFollowRow, DbError> {
    let now = Utc::now();
    let row = sqlx::query_as::<_, FeedFollowRow>(
        "WITH inserted AS ( \
             INSERT INTO feed_follows (id, created_at, updated_at, user_id, feed_id) \
             VALUES ($1, $2, $2, $3, $4) \
             RETURNING id, created_at, user_id, feed_id \
         ) \
         SELECT i.id, i.created_at, i.user_id, i.feed_id, \
                u.name AS user_name, f.name AS feed_name \
         FROM inserted i \
         JOIN users u ON u.id = i.user_id \
         JOIN feeds f ON f.id = i.feed_id",
    )
    .bind(Uuid::new_v4())
    .bind(now)
    .bind(user_id)
    .bind(feed_id)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Lists the feeds `user_id` follows, oldest follow first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_feed_follows_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<FeedFollowRow>, DbError> {
    let rows = sqlx::query_as::<_, FeedFollowRow>(
        "SELECT ff.id, ff.created_at, ff.user_id, ff.feed_id, \
                u.name AS user_name, f.name AS feed_name \
         FROM feed_follows ff \
         JOIN users u ON u.id = ff.user_id \
         JOIN feeds f ON f.id = ff.feed_id \
         WHERE ff.user_id = $1 \
         ORDER BY ff.created_at, ff.id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Removes the follow linking `user_id` to `feed_id`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the user was not following the feed.
pub async fn delete_feed_follow(pool: &PgPool, user_id: Uuid, feed_id: Uuid) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM feed_follows WHERE user_id = $1 AND feed_id = $2")
        .bind(user_id)
        .bind(feed_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}
