//! Database operations for `retreats`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `retreats` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RetreatRow {
    pub id: i64,
    pub dharma_seed_id: i64,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub language: String,
    pub last_build_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Looks up a retreat by Dharma Seed retreat id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_retreat_by_dharma_seed_id(
    pool: &PgPool,
    dharma_seed_id: i64,
) -> Result<Option<RetreatRow>, DbError> {
    let row = sqlx::query_as::<_, RetreatRow>(
        "SELECT id, dharma_seed_id, slug, title, description, language, \
                last_build_date, created_at, updated_at \
         FROM retreats \
         WHERE dharma_seed_id = $1",
    )
    .bind(dharma_seed_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Upserts a retreat keyed on `dharma_seed_id`.
///
/// Conflicts refresh `title`, `slug`, and `updated_at`; `language` and
/// `last_build_date` keep the values written on insert.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_retreat(
    pool: &PgPool,
    retreat: &dharma_core::RetreatRecord,
) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO retreats (dharma_seed_id, slug, title, language) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (dharma_seed_id) DO UPDATE SET \
             title      = EXCLUDED.title, \
             slug       = EXCLUDED.slug, \
             updated_at = NOW() \
         RETURNING id",
    )
    .bind(retreat.dharma_seed_id)
    .bind(&retreat.slug)
    .bind(&retreat.title)
    .bind(&retreat.language)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Lists every stored retreat, oldest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_retreats(pool: &PgPool) -> Result<Vec<RetreatRow>, DbError> {
    let rows = sqlx::query_as::<_, RetreatRow>(
        "SELECT id, dharma_seed_id, slug, title, description, language, \
                last_build_date, created_at, updated_at \
         FROM retreats \
         ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Writes feed metadata onto an existing retreat.
///
/// A `None` `last_build_date` keeps the stored value. Returns `false` when
/// no retreat has that Dharma Seed id; nothing is inserted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn update_retreat_details(
    pool: &PgPool,
    details: &dharma_core::RetreatDetails,
) -> Result<bool, DbError> {
    let result = sqlx::query(
        "UPDATE retreats SET \
             description     = $2, \
             language        = $3, \
             last_build_date = COALESCE($4, last_build_date), \
             updated_at      = NOW() \
         WHERE dharma_seed_id = $1",
    )
    .bind(details.dharma_seed_id)
    .bind(&details.description)
    .bind(&details.language)
    .bind(details.last_build_date)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
