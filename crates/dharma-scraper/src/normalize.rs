//! Field-level normalization from scraped text to catalog values.
//!
//! None of these functions fail: malformed input is logged and mapped to a
//! neutral value (`0`, `None`) so one odd listing row never stops a sync.

use chrono::NaiveDate;
use dharma_core::{RetreatDetails, TeacherRecord};
use reqwest::Url;

use crate::types::{ScrapedRetreatFeed, ScrapedTeacher};

const RETREAT_PATH_MARKER: &str = "/retreats/";

/// Converts a printed duration to whole seconds.
///
/// Accepts `MM:SS` and `H:MM:SS`. Anything else yields `0` and a warning.
///
/// ```
/// use dharma_scraper::parse_duration_secs;
///
/// assert_eq!(parse_duration_secs("1:02:03"), 3723);
/// assert_eq!(parse_duration_secs("4:56"), 296);
/// assert_eq!(parse_duration_secs("abc"), 0);
/// ```
#[must_use]
pub fn parse_duration_secs(text: &str) -> i32 {
    let parts: Option<Vec<u64>> = text
        .trim()
        .split(':')
        .map(|part| part.trim().parse::<u64>().ok())
        .collect();

    let total = match parts.as_deref() {
        Some(&[minutes, seconds]) => clock_secs(0, minutes, seconds),
        Some(&[hours, minutes, seconds]) => clock_secs(hours, minutes, seconds),
        _ => None,
    };

    match total.and_then(|secs| i32::try_from(secs).ok()) {
        Some(secs) => secs,
        None => {
            tracing::warn!(duration = text, "unparseable talk duration, storing 0");
            0
        }
    }
}

fn clock_secs(hours: u64, minutes: u64, seconds: u64) -> Option<u64> {
    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}

/// Parses a listing date (`YYYY-MM-DD`). Returns `None` with a warning
/// otherwise.
#[must_use]
pub fn parse_recorded_on(text: &str) -> Option<NaiveDate> {
    let parsed = NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok();
    if parsed.is_none() {
        tracing::warn!(date = text, "unparseable recording date");
    }
    parsed
}

/// Extracts the center key from a center link: the first label of a host
/// with at least three labels (`https://imc.dharmaseed.org/` gives `imc`).
///
/// Relative links, bare domains and `www` hosts have no center key.
#[must_use]
pub fn center_subdomain(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?;
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 3 {
        return None;
    }
    let first = labels[0].to_ascii_lowercase();
    if first.is_empty() || first == "www" {
        return None;
    }
    Some(first)
}

/// Returns `true` if `href` points at a retreat page.
#[must_use]
pub fn is_retreat_link(href: &str) -> bool {
    href.contains(RETREAT_PATH_MARKER)
}

/// Extracts the numeric id following `/retreats/` in a retreat link.
#[must_use]
pub fn retreat_id_from_url(url: &str) -> Option<i64> {
    let (_, rest) = url.split_once(RETREAT_PATH_MARKER)?;
    let segment = rest.split(['/', '?', '#']).next()?;
    segment.parse::<i64>().ok().filter(|id| *id > 0)
}

/// Extracts a positive numeric id from the last path segment of `href`,
/// ignoring trailing slashes, query and fragment (`/teacher/96/` gives 96).
#[must_use]
pub fn id_from_path(href: &str) -> Option<i64> {
    let path = href.split(['?', '#']).next()?;
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .next_back()?
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
}

/// Resolves a possibly site-relative link against `base`.
///
/// Links that already start with `http` are returned unchanged.
#[must_use]
pub fn absolute_url(base: &str, href: &str) -> String {
    let href = href.trim();
    if href.starts_with("http") {
        return href.to_owned();
    }
    if let Some(rest) = href.strip_prefix("//") {
        return format!("https://{rest}");
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        href.trim_start_matches('/')
    )
}

/// Converts a scraped teacher into the record the store upserts.
#[must_use]
pub fn teacher_record(teacher: &ScrapedTeacher) -> TeacherRecord {
    TeacherRecord {
        description: teacher.description.clone(),
        profile_image_url: teacher.profile_image_url.clone(),
        website_url: teacher.website_url.clone(),
        donation_url: teacher.donation_url.clone(),
        ..TeacherRecord::new(teacher.dharma_seed_id, teacher.name.clone())
    }
}

/// Converts a retreat feed into the details written onto the stored
/// retreat. A feed without a language is taken to be English.
#[must_use]
pub fn retreat_details(feed: &ScrapedRetreatFeed) -> RetreatDetails {
    RetreatDetails {
        dharma_seed_id: feed.dharma_seed_id,
        description: feed.description.clone(),
        language: feed
            .language
            .clone()
            .unwrap_or_else(|| "en".to_owned()),
        last_build_date: feed.last_build_date,
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
