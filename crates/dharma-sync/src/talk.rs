use dharma_core::{slugify, TalkRecord};
use dharma_scraper::normalize::absolute_url;
use dharma_scraper::{parse_duration_secs, parse_recorded_on, ScrapedTalk};

use crate::error::TalkError;
use crate::resolve::{resolve_center, resolve_retreat, resolve_teacher};
use crate::source::CatalogSource;
use crate::store::CatalogStore;

/// What ingesting one talk touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TalkReport {
    pub talk_id: i64,
    pub teacher_id: i64,
    /// The teacher was fetched and upserted for this talk.
    pub teacher_upserted: bool,
    pub center_id: Option<i64>,
    pub retreat_id: Option<i64>,
}

/// Ingests one talk: teacher, center, retreat, then the talk itself.
///
/// # Errors
///
/// Returns the [`TalkError`] of the first stage that failed. Nothing after
/// that stage is written.
pub async fn process_talk(
    source: &dyn CatalogSource,
    store: &dyn CatalogStore,
    talk: &ScrapedTalk,
) -> Result<TalkReport, TalkError> {
    tracing::debug!(talk_id = talk.talk_id, title = %talk.title, "processing talk");

    let teacher = resolve_teacher(source, store, talk).await?;
    let center_id = resolve_center(store, talk).await?;
    let retreat_id = resolve_retreat(store, talk).await?;

    let record = talk_record(talk, source.base_url(), teacher.id, center_id, retreat_id);
    store
        .upsert_talk(&record)
        .await
        .map_err(|e| TalkError::Talk {
            message: e.to_string(),
        })?;

    tracing::info!(
        talk_id = talk.talk_id,
        title = %talk.title,
        teacher_id = teacher.id,
        center_id = ?center_id,
        retreat_id = ?retreat_id,
        "processed talk"
    );

    Ok(TalkReport {
        talk_id: talk.talk_id,
        teacher_id: teacher.id,
        teacher_upserted: teacher.upserted,
        center_id,
        retreat_id,
    })
}

/// Builds the stored talk from the listing and resolved foreign keys.
#[must_use]
pub fn talk_record(
    talk: &ScrapedTalk,
    base_url: &str,
    teacher_id: i64,
    center_id: Option<i64>,
    retreat_id: Option<i64>,
) -> TalkRecord {
    TalkRecord {
        dharma_seed_id: talk.talk_id,
        slug: slugify(&talk.title, talk.talk_id),
        external_guid: TalkRecord::external_guid_for(talk.talk_id),
        title: talk.title.clone(),
        description: talk.description.clone(),
        audio_url: talk
            .audio_url
            .as_deref()
            .map(|href| absolute_url(base_url, href)),
        duration_secs: parse_duration_secs(&talk.time),
        recorded_on: parse_recorded_on(&talk.date),
        teacher_id,
        center_id,
        retreat_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn talk_record_normalizes_listing_fields() {
        let talk = ScrapedTalk {
            talk_id: 101,
            title: "Metta Practice".to_owned(),
            teacher: "Gil Fronsdal".to_owned(),
            teacher_url: Some("/teacher/96/".to_owned()),
            teacher_id: Some(96),
            description: Some("Loving-kindness".to_owned()),
            center: None,
            center_url: None,
            center_subdomain: None,
            retreat: None,
            retreat_url: None,
            retreat_id: None,
            date: "2024-05-01".to_owned(),
            time: "1:02:03".to_owned(),
            audio_url: Some("/talks/101/metta.mp3".to_owned()),
        };

        let record = talk_record(&talk, "https://dharmaseed.org", 7, Some(3), None);

        assert_eq!(record.slug, "metta-practice-101");
        assert_eq!(record.external_guid, "dharmaseed-talk-101");
        assert_eq!(record.duration_secs, 3723);
        assert_eq!(
            record.audio_url.as_deref(),
            Some("https://dharmaseed.org/talks/101/metta.mp3")
        );
        assert_eq!(record.recorded_on, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(record.teacher_id, 7);
        assert_eq!(record.center_id, Some(3));
        assert!(record.retreat_id.is_none());
    }
}
