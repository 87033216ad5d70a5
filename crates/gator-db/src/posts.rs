//! Database operations for `posts`.

use chrono::{DateTime, Utc};
use gator_core::NewPost;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// Name of the unique constraint on `posts.url`.
pub const POSTS_URL_KEY: &str = "posts_url_key";

/// A row from the `posts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub published_at: DateTime<Utc>,
    pub feed_id: Uuid,
}

/// A post joined with the name of the feed it came from.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostWithFeedRow {
    pub title: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub feed_name: String,
}

/// Inserts a post.
///
/// # Errors
///
/// Returns [`DbError::DuplicatePostUrl`] when a post with the same URL is
/// already stored, or [`DbError::Sqlx`] for any other failure.
pub async fn insert_post(pool: &PgPool, post: &NewPost) -> Result<PostRow, DbError> {
    let result = sqlx::query_as::<_, PostRow>(
        "INSERT INTO posts \
             (id, created_at, updated_at, title, url, description, published_at, feed_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING id, created_at, updated_at, title, url, description, published_at, feed_id",
    )
    .bind(post.id)
    .bind(post.created_at)
    .bind(post.updated_at)
    .bind(&post.title)
    .bind(&post.url)
    .bind(post.description.as_deref())
    .bind(post.published_at)
    .bind(post.feed_id)
    .fetch_one(pool)
    .await;

    match result {
        Ok(row) => Ok(row),
        Err(e) => {
            let err = DbError::from(e);
            if err.is_unique_violation(POSTS_URL_KEY) {
                Err(DbError::DuplicatePostUrl(post.url.clone()))
            } else {
                Err(err)
            }
        }
    }
}

/// Returns the newest `limit` posts from feeds `user_id` follows.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_posts_for_user(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<PostWithFeedRow>, DbError> {
    let rows = sqlx::query_as::<_, PostWithFeedRow>(
        "SELECT p.title, p.url, p.published_at, f.name AS feed_name \
         FROM posts p \
         JOIN feeds f ON f.id = p.feed_id \
         JOIN feed_follows ff ON ff.feed_id = p.feed_id \
         WHERE ff.user_id = $1 \
         ORDER BY p.published_at DESC, p.id \
         LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
