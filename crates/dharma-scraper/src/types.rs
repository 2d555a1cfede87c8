use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One talk as it appears on a listing page.
///
/// Produced by [`crate::parse::parse_talks`] and consumed once by the sync
/// pipeline. Required fields are guaranteed non-empty; everything the markup
/// may legitimately omit is an `Option`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedTalk {
    /// Numeric Dharma Seed talk id.
    pub talk_id: i64,
    pub title: String,
    /// Teacher display name from the listing.
    pub teacher: String,
    /// Raw href of the teacher link, e.g. `/teacher/96/`.
    pub teacher_url: Option<String>,
    /// Numeric teacher id parsed from `teacher_url`.
    pub teacher_id: Option<i64>,
    pub description: Option<String>,
    pub center: Option<String>,
    pub center_url: Option<String>,
    /// First host label of `center_url`, e.g. `imc`.
    pub center_subdomain: Option<String>,
    pub retreat: Option<String>,
    pub retreat_url: Option<String>,
    pub retreat_id: Option<i64>,
    /// Recording date as printed, normally `YYYY-MM-DD`.
    pub date: String,
    /// Duration as printed, `MM:SS` or `H:MM:SS`.
    pub time: String,
    /// Raw href of the download button; may be site-relative.
    pub audio_url: Option<String>,
}

/// A teacher profile from either the detail page or the teacher list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedTeacher {
    pub dharma_seed_id: i64,
    /// Empty when a detail page carries no name heading.
    pub name: String,
    pub description: Option<String>,
    pub profile_image_url: Option<String>,
    pub website_url: Option<String>,
    pub donation_url: Option<String>,
}

/// Channel-level metadata from a retreat's RSS feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedRetreatFeed {
    pub dharma_seed_id: i64,
    /// Channel title with the site prefix removed.
    pub title: String,
    pub description: Option<String>,
    pub language: Option<String>,
    /// `lastBuildDate` of the channel.
    pub last_build_date: Option<DateTime<Utc>>,
    /// Talk ids of the feed items, in feed order.
    pub talk_ids: Vec<i64>,
}
