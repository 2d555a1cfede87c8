//! Normalized catalog records, ready to be written to the store.
//!
//! Each record carries the external key it is upserted on plus the derived
//! slug. Constructors derive the slug so callers cannot pick one freely.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::slug::slugify;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherRecord {
    pub dharma_seed_id: i64,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub profile_image_url: Option<String>,
    pub website_url: Option<String>,
    pub donation_url: Option<String>,
}

impl TeacherRecord {
    #[must_use]
    pub fn new(dharma_seed_id: i64, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            dharma_seed_id,
            slug: slugify(&name, dharma_seed_id),
            name,
            description: None,
            profile_image_url: None,
            website_url: None,
            donation_url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CenterRecord {
    /// Subdomain of the center's page on the source site, e.g. `"imc"`.
    pub subdomain: String,
    pub slug: String,
    pub name: String,
}

impl CenterRecord {
    #[must_use]
    pub fn new(subdomain: impl Into<String>, name: impl Into<String>) -> Self {
        let subdomain = subdomain.into();
        let name = name.into();
        Self {
            slug: slugify(&name, &subdomain),
            subdomain,
            name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetreatRecord {
    pub dharma_seed_id: i64,
    pub slug: String,
    pub title: String,
    pub language: String,
}

impl RetreatRecord {
    #[must_use]
    pub fn new(dharma_seed_id: i64, title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            dharma_seed_id,
            slug: slugify(&title, dharma_seed_id),
            title,
            language: "en".to_string(),
        }
    }
}

/// Feed metadata for a retreat that is already stored, keyed on its
/// Dharma Seed id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetreatDetails {
    pub dharma_seed_id: i64,
    pub description: Option<String>,
    pub language: String,
    /// `None` keeps the stored value.
    pub last_build_date: Option<DateTime<Utc>>,
}

/// A talk with its foreign keys already resolved to internal row ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TalkRecord {
    pub dharma_seed_id: i64,
    pub slug: String,
    pub external_guid: String,
    pub title: String,
    pub description: Option<String>,
    pub audio_url: Option<String>,
    pub duration_secs: i32,
    pub recorded_on: Option<NaiveDate>,
    pub teacher_id: i64,
    pub center_id: Option<i64>,
    pub retreat_id: Option<i64>,
}

impl TalkRecord {
    /// Stable external GUID for a talk, as exposed in podcast feeds.
    #[must_use]
    pub fn external_guid_for(dharma_seed_id: i64) -> String {
        format!("dharmaseed-talk-{dharma_seed_id}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn teacher_record_derives_slug_from_name_and_id() {
        let teacher = TeacherRecord::new(96, "Gil Fronsdal");
        assert_eq!(teacher.slug, "gil-fronsdal-96");
        assert!(teacher.description.is_none());
    }

    #[test]
    fn center_record_uses_subdomain_as_slug_key() {
        let center = CenterRecord::new("imc", "Insight Meditation Center");
        assert_eq!(center.slug, "insight-meditation-center-imc");
        assert_eq!(center.subdomain, "imc");
    }

    #[test]
    fn retreat_record_defaults_language_to_english() {
        let retreat = RetreatRecord::new(4567, "Winter Retreat");
        assert_eq!(retreat.language, "en");
        assert_eq!(retreat.slug, "winter-retreat-4567");
    }

    #[test]
    fn external_guid_is_prefixed() {
        assert_eq!(TalkRecord::external_guid_for(103), "dharmaseed-talk-103");
    }

    #[test]
    fn records_round_trip_through_json() {
        let teacher = TeacherRecord::new(1, "Ajahn Chah");
        let json = serde_json::to_string(&teacher).expect("serialize");
        let back: TeacherRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, teacher);
    }
}
