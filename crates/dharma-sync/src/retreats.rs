//! Retreat enrichment: reads each stored retreat's RSS feed and writes its
//! description, language and last build date back onto the row.

use std::time::Instant;

use dharma_scraper::retreat_details;

use crate::batch::process_batch;
use crate::error::{RetreatFeedError, SyncError};
use crate::options::SyncOptions;
use crate::source::CatalogSource;
use crate::stats::SyncStats;
use crate::store::CatalogStore;

/// Enriches every stored retreat from `/feeds/retreat/{id}/`.
///
/// Retreats are created by the talk sync; this only updates them. A feed
/// that cannot be fetched or applied is recorded in `stats.retreats` and
/// the run continues.
///
/// # Errors
///
/// [`SyncError::RetreatList`] when the stored retreats cannot be listed.
pub async fn sync_retreats(
    source: &dyn CatalogSource,
    store: &dyn CatalogStore,
    options: &SyncOptions,
) -> Result<SyncStats, SyncError> {
    let started = Instant::now();
    let mut stats = SyncStats::default();

    let retreats = store.retreats().await.map_err(|err| {
        tracing::error!(error = %err, "retreat sync aborted");
        SyncError::RetreatList(err)
    })?;
    tracing::info!(retreats = retreats.len(), "starting retreat sync");

    let outcomes = process_batch(
        &retreats,
        options.batch_size,
        options.batch_delay,
        &options.item_retry,
        |(retreat_id, _)| enrich_retreat(source, store, *retreat_id),
    )
    .await;

    for ((retreat_id, title), outcome) in retreats.iter().zip(outcomes) {
        match outcome {
            Ok(()) => stats.retreats.record_success(),
            Err(err) => {
                tracing::error!(
                    retreat_id,
                    title = %title,
                    error = %err,
                    "failed to enrich retreat"
                );
                stats
                    .retreats
                    .record_failure(retreat_id, title.as_str(), err.to_string());
            }
        }
    }

    stats.duration = started.elapsed();
    stats.summary().log("retreats");
    Ok(stats)
}

async fn enrich_retreat(
    source: &dyn CatalogSource,
    store: &dyn CatalogStore,
    retreat_id: i64,
) -> Result<(), RetreatFeedError> {
    let feed = source.retreat_feed(retreat_id).await?;
    let details = retreat_details(&feed);
    if !store.update_retreat_details(&details).await? {
        return Err(RetreatFeedError::Missing);
    }
    tracing::debug!(
        retreat_id,
        language = %details.language,
        talks = feed.talk_ids.len(),
        "enriched retreat"
    );
    Ok(())
}
