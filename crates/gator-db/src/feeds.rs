//! Database operations for `feeds`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// Name of the unique constraint on `feeds.url`.
pub const FEEDS_URL_KEY: &str = "feeds_url_key";

/// A row from the `feeds` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FeedRow {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    pub url: String,
    pub user_id: Uuid,
    pub last_fetched_at: Option<DateTime<Utc>>,
}

impl From<FeedRow> for gator_core::Feed {
    fn from(row: FeedRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            url: row.url,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            last_fetched_at: row.last_fetched_at,
        }
    }
}

/// A feed joined with the name of the user who added it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FeedWithOwnerRow {
    pub name: String,
    pub url: String,
    pub owner_name: String,
}

const FEED_COLUMNS: &str = "id, created_at, updated_at, name, url, user_id, last_fetched_at";

/// Creates a feed owned by `user_id`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails, including a unique
/// violation on `feeds_url_key` when the URL is already registered.
pub async fn create_feed(
    pool: &PgPool,
    name: &str,
    url: &str,
    user_id: Uuid,
) -> Result<FeedRow, DbError> {
    let now = Utc::now();
    let row = sqlx::query_as::<_, FeedRow>(&format!(
        "INSERT INTO feeds (id, created_at, updated_at, name, url, user_id) \
         VALUES ($1, $2, $2, $3, $4, $5) \
         RETURNING {FEED_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(now)
    .bind(name)
    .bind(url)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// # Errors
///
/// Returns [`DbError::NotFound`] if no feed has this URL.
pub async fn get_feed_by_url(pool: &PgPool, url: &str) -> Result<FeedRow, DbError> {
    sqlx::query_as::<_, FeedRow>(&format!(
        "SELECT {FEED_COLUMNS} FROM feeds WHERE url = $1"
    ))
    .bind(url)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

/// Lists every feed with its owner's name, oldest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_feeds_with_owner(pool: &PgPool) -> Result<Vec<FeedWithOwnerRow>, DbError> {
    let rows = sqlx::query_as::<_, FeedWithOwnerRow>(
        "SELECT f.name, f.url, u.name AS owner_name \
         FROM feeds f \
         JOIN users u ON u.id = f.user_id \
         ORDER BY f.created_at, f.id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns the feed that is most overdue for a fetch.
///
/// Never-fetched feeds (`last_fetched_at IS NULL`) come first, then the
/// oldest fetch time. Ties are broken by `id` so selection is deterministic.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] when there are no feeds.
pub async fn next_feed_to_fetch(pool: &PgPool) -> Result<FeedRow, DbError> {
    sqlx::query_as::<_, FeedRow>(&format!(
        "SELECT {FEED_COLUMNS} FROM feeds \
         ORDER BY last_fetched_at ASC NULLS FIRST, id ASC \
         LIMIT 1"
    ))
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

/// Sets `last_fetched_at` (and `updated_at`) to `fetched_at`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the feed no longer exists.
pub async fn mark_feed_fetched(
    pool: &PgPool,
    feed_id: Uuid,
    fetched_at: DateTime<Utc>,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE feeds SET last_fetched_at = $1, updated_at = $1 WHERE id = $2",
    )
    .bind(fetched_at)
    .bind(feed_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}
