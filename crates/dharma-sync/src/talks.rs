//! Talk sync: the listing crawl that drives the whole pipeline.

use std::time::Instant;

use dharma_scraper::ScrapedTalk;

use crate::batch::process_batch;
use crate::dedup::filter_new_talks;
use crate::error::SyncError;
use crate::options::SyncOptions;
use crate::source::CatalogSource;
use crate::stats::SyncStats;
use crate::store::CatalogStore;
use crate::talk::process_talk;

/// Crawls the talk listing from page 1 and ingests every talk the store does
/// not know yet.
///
/// The crawl stops at the first empty page, at `options.max_pages`, or, in
/// normal mode, at the first page with no new talks. The listing is sorted
/// newest first, so a page of known talks means every older page has been
/// synced already. A source that backfills old recordings would defeat this.
///
/// With `options.skip_processing`, new talks are counted but not ingested and
/// pages without new talks do not stop the crawl.
///
/// Per-talk failures are recorded in the returned stats and never abort the
/// run. The summary is logged on every exit path.
///
/// # Errors
///
/// [`SyncError::PageFetch`] when a listing page fails after all retries;
/// [`SyncError::Dedup`] when the known-talk lookup fails.
pub async fn sync_talks(
    source: &dyn CatalogSource,
    store: &dyn CatalogStore,
    options: &SyncOptions,
) -> Result<SyncStats, SyncError> {
    let started = Instant::now();
    let mut stats = SyncStats::default();
    tracing::info!(
        skip_processing = options.skip_processing,
        max_pages = ?options.max_pages,
        "starting talk sync"
    );

    let result = crawl(source, store, options, &mut stats).await;

    stats.duration = started.elapsed();
    stats.summary().log("talks");
    match result {
        Ok(()) => Ok(stats),
        Err(err) => {
            tracing::error!(error = %err, "talk sync aborted");
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
        let scraped = source
            .talks_page(page)
            .await
            .map_err(|source| SyncError::PageFetch {
                listing: "talks",
                page,
                source,
            })?;
        stats.pages_fetched += 1;
        tracing::info!(page, talks = scraped.len(), "fetched talk listing page");

        if scraped.is_empty() {
            tracing::info!(page, "talk listing exhausted");
            return Ok(());
        }

        let new_talks = filter_new_talks(store, scraped)
            .await
            .map_err(|source| SyncError::Dedup { page, source })?;
        stats.new_talks_found += new_talks.len() as u64;

        if new_talks.is_empty() {
            if !options.skip_processing {
                tracing::info!(page, "no new talks on page, stopping");
                return Ok(());
            }
            tracing::info!(page, "no new talks on page");
        } else if options.skip_processing {
            let ids: Vec<i64> = new_talks.iter().map(|t| t.talk_id).collect();
            tracing::info!(page, new_talks = ids.len(), ids = ?ids, "new talks found, not ingesting");
        } else {
            ingest_page(source, store, options, &new_talks, stats).await;
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

async fn ingest_page(
    source: &dyn CatalogSource,
    store: &dyn CatalogStore,
    options: &SyncOptions,
    talks: &[ScrapedTalk],
    stats: &mut SyncStats,
) {
    let outcomes = process_batch(
        talks,
        options.batch_size,
        options.batch_delay,
        &options.item_retry,
        |talk| process_talk(source, store, talk),
    )
    .await;

    for (talk, outcome) in talks.iter().zip(&outcomes) {
        if let Err(err) = outcome {
            tracing::error!(
                talk_id = talk.talk_id,
                title = %talk.title,
                error = %err,
                "failed to process talk"
            );
        }
        stats.record_talk(talk, outcome);
    }
}
