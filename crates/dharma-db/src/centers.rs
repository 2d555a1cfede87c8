//! Database operations for `centers`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `centers` table.
///
/// Centers have no numeric id on Dharma Seed; they are keyed on the
/// subdomain of their listing site (`imc` for `imc.dharmaseed.org`).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CenterRow {
    pub id: i64,
    pub dharma_seed_subdomain: String,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Looks up a center by its Dharma Seed subdomain.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_center_by_subdomain(
    pool: &PgPool,
    subdomain: &str,
) -> Result<Option<CenterRow>, DbError> {
    let row = sqlx::query_as::<_, CenterRow>(
        "SELECT id, dharma_seed_subdomain, slug, name, description, created_at, updated_at \
         FROM centers \
         WHERE dharma_seed_subdomain = $1",
    )
    .bind(subdomain)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Upserts a center keyed on `dharma_seed_subdomain`.
///
/// Conflicts refresh `name`, `slug`, and `updated_at`. Returns the internal id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_center(
    pool: &PgPool,
    center: &dharma_core::CenterRecord,
) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO centers (dharma_seed_subdomain, slug, name) \
         VALUES ($1, $2, $3) \
         ON CONFLICT (dharma_seed_subdomain) DO UPDATE SET \
             name       = EXCLUDED.name, \
             slug       = EXCLUDED.slug, \
             updated_at = NOW() \
         RETURNING id",
    )
    .bind(&center.subdomain)
    .bind(&center.slug)
    .bind(&center.name)
    .fetch_one(pool)
    .await?;

    Ok(id)
}
