//! The persistence operations the pipeline needs, behind a trait so the
//! orchestrator can run against Postgres or an in-memory fake.

use std::collections::HashSet;

use async_trait::async_trait;
use dharma_core::{CenterRecord, RetreatDetails, RetreatRecord, TalkRecord, TeacherRecord};
use dharma_db::{DbError, TeacherUpsert};
use sqlx::PgPool;

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Which of `talk_ids` already exist, in one lookup.
    async fn existing_talk_ids(&self, talk_ids: &[i64]) -> Result<HashSet<i64>, DbError>;

    /// Internal id of the teacher with this Dharma Seed id, if stored.
    async fn find_teacher(&self, dharma_seed_id: i64) -> Result<Option<i64>, DbError>;

    async fn upsert_teacher(&self, teacher: &TeacherRecord) -> Result<TeacherUpsert, DbError>;

    async fn upsert_center(&self, center: &CenterRecord) -> Result<i64, DbError>;

    async fn upsert_retreat(&self, retreat: &RetreatRecord) -> Result<i64, DbError>;

    async fn upsert_talk(&self, talk: &TalkRecord) -> Result<i64, DbError>;

    /// Every stored retreat as `(dharma_seed_id, title)`.
    async fn retreats(&self) -> Result<Vec<(i64, String)>, DbError>;

    /// `false` when the retreat is not stored.
    async fn update_retreat_details(&self, details: &RetreatDetails) -> Result<bool, DbError>;
}

/// [`CatalogStore`] backed by the Postgres catalog tables.
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn existing_talk_ids(&self, talk_ids: &[i64]) -> Result<HashSet<i64>, DbError> {
        dharma_db::existing_talk_ids(&self.pool, talk_ids).await
    }

    async fn find_teacher(&self, dharma_seed_id: i64) -> Result<Option<i64>, DbError> {
        Ok(
            dharma_db::get_teacher_by_dharma_seed_id(&self.pool, dharma_seed_id)
                .await?
                .map(|row| row.id),
        )
    }

    async fn upsert_teacher(&self, teacher: &TeacherRecord) -> Result<TeacherUpsert, DbError> {
        dharma_db::upsert_teacher(&self.pool, teacher).await
    }

    async fn upsert_center(&self, center: &CenterRecord) -> Result<i64, DbError> {
        dharma_db::upsert_center(&self.pool, center).await
    }

    async fn upsert_retreat(&self, retreat: &RetreatRecord) -> Result<i64, DbError> {
        dharma_db::upsert_retreat(&self.pool, retreat).await
    }

    async fn upsert_talk(&self, talk: &TalkRecord) -> Result<i64, DbError> {
        dharma_db::upsert_talk(&self.pool, talk).await
    }

    async fn retreats(&self) -> Result<Vec<(i64, String)>, DbError> {
        Ok(dharma_db::list_retreats(&self.pool)
            .await?
            .into_iter()
            .map(|row| (row.dharma_seed_id, row.title))
            .collect())
    }

    async fn update_retreat_details(&self, details: &RetreatDetails) -> Result<bool, DbError> {
        dharma_db::update_retreat_details(&self.pool, details).await
    }
}
