use feed_rs::parser;

use super::helpers::non_empty;
use crate::error::ScraperError;
use crate::normalize::id_from_path;
use crate::types::ScrapedRetreatFeed;

const TITLE_PREFIX: &str = "Dharma Seed - dharmaseed.org: ";
const TITLE_SUFFIX: &str = "'s most recent Dharma talks";

/// Parses a retreat RSS feed (`/feeds/retreat/{id}/`).
///
/// Only channel metadata and the talk ids of the items are kept. Items
/// whose link is not a talk page are skipped.
///
/// # Errors
///
/// Returns [`ScraperError::Feed`] if `xml` is not an RSS or Atom document.
pub fn parse_retreat_feed(xml: &str, retreat_id: i64) -> Result<ScrapedRetreatFeed, ScraperError> {
    let feed = parser::parse(xml.as_bytes()).map_err(|e| ScraperError::Feed {
        retreat_id,
        reason: e.to_string(),
    })?;

    let title = feed
        .title
        .map(|text| {
            let title = text.content.trim();
            let title = title.strip_prefix(TITLE_PREFIX).unwrap_or(title);
            title.strip_suffix(TITLE_SUFFIX).unwrap_or(title).to_owned()
        })
        .unwrap_or_default();

    let talk_ids = feed
        .entries
        .iter()
        .filter_map(|entry| {
            entry
                .links
                .iter()
                .map(|link| link.href.as_str())
                .find(|href| href.contains("/talks/"))
                .and_then(id_from_path)
        })
        .collect();

    Ok(ScrapedRetreatFeed {
        dharma_seed_id: retreat_id,
        title,
        description: feed
            .description
            .and_then(|text| non_empty(text.content.trim().to_owned())),
        language: feed
            .language
            .and_then(|language| non_empty(language.trim().to_owned())),
        last_build_date: feed.updated,
        talk_ids,
    })
}

#[cfg(test)]
#[path = "retreat_feed_test.rs"]
mod tests;
