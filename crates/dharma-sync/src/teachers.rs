//! Teacher-only sync: walks the teacher list and upserts every profile.

use std::time::Instant;

use dharma_db::{DbError, TeacherUpsert};
use dharma_scraper::{teacher_record, ScrapedTeacher};

use crate::batch::process_batch;
use crate::error::SyncError;
use crate::options::SyncOptions;
use crate::source::CatalogSource;
use crate::stats::SyncStats;
use crate::store::CatalogStore;

/// Fetches the teacher list page by page until an empty page (or
/// `options.max_pages`) and upserts each teacher by Dharma Seed id.
///
/// Talks, centers and retreats are not touched. A teacher that fails to
/// upsert is recorded in `stats.teachers` and the run continues.
///
/// # Errors
///
/// [`SyncError::PageFetch`] when a list page fails after all retries.
pub async fn sync_teachers(
    source: &dyn CatalogSource,
    store: &dyn CatalogStore,
    options: &SyncOptions,
) -> Result<SyncStats, SyncError> {
    let started = Instant::now();
    let mut stats = SyncStats::default();
    tracing::info!(max_pages = ?options.max_pages, "starting teacher sync");

    let result = crawl(source, store, options, &mut stats).await;

    stats.duration = started.elapsed();
    stats.summary().log("teachers");
    match result {
        Ok(()) => Ok(stats),
        Err(err) => {
            tracing::error!(error = %err, "teacher sync aborted");
            Err(err)
        }
    }
}

async fn crawl(
    source: &dyn CatalogSource,
    store: &dyn CatalogStore,
    options: &SyncOptions,
    stats: &mut SyncStats,
) -> Result<(), SyncError> {
    let mut page = 1u32;

    loop {
        let teachers = source
            .teachers_page(page)
            .await
            .map_err(|source| SyncError::PageFetch {
                listing: "teachers",
                page,
                source,
            })?;
        stats.pages_fetched += 1;
        tracing::info!(page, teachers = teachers.len(), "fetched teacher list page");

        if teachers.is_empty() {
            tracing::info!(page, "teacher list exhausted");
            return Ok(());
        }

        let outcomes = process_batch(
            &teachers,
            options.batch_size,
            options.batch_delay,
            &options.item_retry,
            |teacher| upsert_teacher(store, teacher),
        )
        .await;

        for (teacher, outcome) in teachers.iter().zip(outcomes) {
            match outcome {
                Ok(_) => stats.teachers.record_success(),
                Err(err) => {
                    tracing::error!(
                        teacher_id = teacher.dharma_seed_id,
                        name = %teacher.name,
                        error = %err,
                        "failed to upsert teacher"
                    );
                    stats.teachers.record_failure(
                        teacher.dharma_seed_id,
                        teacher.name.as_str(),
                        err.to_string(),
                    );
                }
            }
        }

        if options.limit_reached(page) {
            tracing::info!(page, "page limit reached");
            return Ok(());
        }

        page += 1;
        if !options.page_delay.is_zero() {
            tokio::time::sleep(options.page_delay).await;
        }
    }
}

async fn upsert_teacher(
    store: &dyn CatalogStore,
    teacher: &ScrapedTeacher,
) -> Result<TeacherUpsert, DbError> {
    let upsert = store.upsert_teacher(&teacher_record(teacher)).await?;
    tracing::debug!(
        teacher_id = teacher.dharma_seed_id,
        name = %teacher.name,
        inserted = upsert.inserted,
        "upserted teacher"
    );
    Ok(upsert)
}
