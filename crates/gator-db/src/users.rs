//! Database operations for `users`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// Name of the unique constraint on `users.name`.
pub const USERS_NAME_KEY: &str = "users_name_key";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
}

/// Creates a user with a freshly generated id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails, including a unique
/// violation on `users_name_key` when the name is taken.
pub async fn create_user(pool: &PgPool, name: &str) -> Result<UserRow, DbError> {
    let now = Utc::now();
    let row = sqlx::query_as::<_, UserRow>(
        "INSERT INTO users (id, created_at, updated_at, name) \
         VALUES ($1, $2, $2, $3) \
         RETURNING id, created_at, updated_at, name",
    )
    .bind(Uuid::new_v4())
    .bind(now)
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// # Errors
///
/// Returns [`DbError::NotFound`] if no user has this name.
pub async fn get_user_by_name(pool: &PgPool, name: &str) -> Result<UserRow, DbError> {
    sqlx::query_as::<_, UserRow>(
        "SELECT id, created_at, updated_at, name FROM users WHERE name = $1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_users(pool: &PgPool) -> Result<Vec<UserRow>, DbError> {
    let rows = sqlx::query_as::<_, UserRow>(
        "SELECT id, created_at, updated_at, name FROM users ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Deletes every user. Feeds, follows, and posts cascade.
///
/// Returns the number of users removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_all_users(pool: &PgPool) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM users").execute(pool).await?;
    Ok(result.rows_affected())
}
