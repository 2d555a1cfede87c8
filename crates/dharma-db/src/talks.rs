//! Database operations for `talks`.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `talks` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TalkRow {
    pub id: i64,
    pub dharma_seed_id: i64,
    pub slug: String,
    pub external_guid: String,
    pub title: String,
    pub description: Option<String>,
    /// Absolute URL; `NULL` when the listing carried no audio link.
    pub audio_url: Option<String>,
    pub duration_secs: i32,
    pub recorded_on: Option<NaiveDate>,
    pub teacher_id: i64,
    pub center_id: Option<i64>,
    pub retreat_id: Option<i64>,
    pub publication_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Returns the subset of `dharma_seed_ids` that already exist in `talks`.
///
/// Issues a single `= ANY($1)` query regardless of input size. An empty
/// input returns an empty set without touching the database.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn existing_talk_ids(
    pool: &PgPool,
    dharma_seed_ids: &[i64],
) -> Result<HashSet<i64>, DbError> {
    if dharma_seed_ids.is_empty() {
        return Ok(HashSet::new());
    }

    let ids: Vec<i64> = sqlx::query_scalar::<_, i64>(
        "SELECT dharma_seed_id FROM talks WHERE dharma_seed_id = ANY($1)",
    )
    .bind(dharma_seed_ids)
    .fetch_all(pool)
    .await?;

    Ok(ids.into_iter().collect())
}

/// Looks up a talk by Dharma Seed talk id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_talk_by_dharma_seed_id(
    pool: &PgPool,
    dharma_seed_id: i64,
) -> Result<Option<TalkRow>, DbError> {
    let row = sqlx::query_as::<_, TalkRow>(
        "SELECT id, dharma_seed_id, slug, external_guid, title, description, audio_url, \
                duration_secs, recorded_on, teacher_id, center_id, retreat_id, \
                publication_date, created_at, updated_at \
         FROM talks \
         WHERE dharma_seed_id = $1",
    )
    .bind(dharma_seed_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Upserts a talk keyed on `dharma_seed_id`.
///
/// Conflicts update `title`, `description`, `audio_url`, `center_id`, and
/// `updated_at`. Identity, slug, teacher, retreat, duration and `created_at`
/// keep the values written on first insert.
///
/// Returns the internal `id` of the upserted row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails (including a foreign-key
/// violation when a referenced teacher/center/retreat row is missing).
pub async fn upsert_talk(pool: &PgPool, talk: &dharma_core::TalkRecord) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO talks \
             (dharma_seed_id, slug, external_guid, title, description, audio_url, \
              duration_secs, recorded_on, teacher_id, center_id, retreat_id) \
         VALUES ($1, $2, $3, $4, $5, $6, \
                 $7, $8, $9, $10, $11) \
         ON CONFLICT (dharma_seed_id) DO UPDATE SET \
             title       = EXCLUDED.title, \
             description = EXCLUDED.description, \
             audio_url   = EXCLUDED.audio_url, \
             center_id   = EXCLUDED.center_id, \
             updated_at  = NOW() \
         RETURNING id",
    )
    .bind(talk.dharma_seed_id)
    .bind(&talk.slug)
    .bind(&talk.external_guid)
    .bind(&talk.title)
    .bind(&talk.description)
    .bind(&talk.audio_url)
    .bind(talk.duration_secs)
    .bind(talk.recorded_on)
    .bind(talk.teacher_id)
    .bind(talk.center_id)
    .bind(talk.retreat_id)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Returns the total number of talks in the catalog.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_talks(pool: &PgPool) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM talks")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
