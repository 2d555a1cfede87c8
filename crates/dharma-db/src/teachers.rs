//! Database operations for `teachers`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `teachers` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TeacherRow {
    pub id: i64,
    pub dharma_seed_id: i64,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub profile_image_url: Option<String>,
    pub website_url: Option<String>,
    pub donation_url: Option<String>,
    pub published_on: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of [`upsert_teacher`]: the internal id plus whether this call
/// created the row (as opposed to refreshing an existing one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct TeacherUpsert {
    pub id: i64,
    pub inserted: bool,
}

/// Looks up a teacher by Dharma Seed teacher id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_teacher_by_dharma_seed_id(
    pool: &PgPool,
    dharma_seed_id: i64,
) -> Result<Option<TeacherRow>, DbError> {
    let row = sqlx::query_as::<_, TeacherRow>(
        "SELECT id, dharma_seed_id, slug, name, description, profile_image_url, \
                website_url, donation_url, published_on, created_at, updated_at \
         FROM teachers \
         WHERE dharma_seed_id = $1",
    )
    .bind(dharma_seed_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Upserts a teacher keyed on `dharma_seed_id`.
///
/// Conflicts update `name`, `slug`, `description`, `profile_image_url`,
/// `website_url`, `donation_url`, and `updated_at`; `id`, `created_at` and
/// `published_on` are preserved. The slug follows the name so that a renamed
/// teacher keeps a slug consistent with `(name, dharma_seed_id)`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_teacher(
    pool: &PgPool,
    teacher: &dharma_core::TeacherRecord,
) -> Result<TeacherUpsert, DbError> {
    // `xmax = 0` holds only for a tuple written by a plain INSERT.
    let result = sqlx::query_as::<_, TeacherUpsert>(
        "INSERT INTO teachers \
             (dharma_seed_id, slug, name, description, profile_image_url, \
              website_url, donation_url) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         ON CONFLICT (dharma_seed_id) DO UPDATE SET \
             slug              = EXCLUDED.slug, \
             name              = EXCLUDED.name, \
             description       = EXCLUDED.description, \
             profile_image_url = EXCLUDED.profile_image_url, \
             website_url       = EXCLUDED.website_url, \
             donation_url      = EXCLUDED.donation_url, \
             updated_at        = NOW() \
         RETURNING id, (xmax = 0) AS inserted",
    )
    .bind(teacher.dharma_seed_id)
    .bind(&teacher.slug)
    .bind(&teacher.name)
    .bind(&teacher.description)
    .bind(&teacher.profile_image_url)
    .bind(&teacher.website_url)
    .bind(&teacher.donation_url)
    .fetch_one(pool)
    .await?;

    Ok(result)
}
