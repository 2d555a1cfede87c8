use std::collections::HashSet;

use dharma_db::DbError;
use dharma_scraper::ScrapedTalk;

use crate::store::CatalogStore;

/// Drops talks whose Dharma Seed id the store already has, with a single
/// batched lookup. Repeated ids within `talks` keep their first occurrence.
///
/// Only external ids are compared; titles and slugs are ignored.
///
/// # Errors
///
/// Returns [`DbError`] if the existence lookup fails.
pub async fn filter_new_talks(
    store: &dyn CatalogStore,
    talks: Vec<ScrapedTalk>,
) -> Result<Vec<ScrapedTalk>, DbError> {
    if talks.is_empty() {
        return Ok(talks);
    }

    let ids: Vec<i64> = talks.iter().map(|t| t.talk_id).collect();
    let existing = store.existing_talk_ids(&ids).await?;

    let mut seen = HashSet::with_capacity(talks.len());
    Ok(talks
        .into_iter()
        .filter(|t| !existing.contains(&t.talk_id) && seen.insert(t.talk_id))
        .collect())
}
