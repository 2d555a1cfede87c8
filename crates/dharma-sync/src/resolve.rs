//! Resolve the teacher, center and retreat a scraped talk refers to.
//!
//! Each resolver returns `Ok(None)` when the talk legitimately has no such
//! entity and `Err` only when a lookup, fetch or upsert actually failed.

use dharma_core::{CenterRecord, RetreatRecord};
use dharma_scraper::{teacher_record, ScrapedTalk};

use crate::error::TalkError;
use crate::source::CatalogSource;
use crate::store::CatalogStore;

/// A teacher row id and whether this call wrote the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTeacher {
    pub id: i64,
    pub upserted: bool,
}

/// Finds the talk's teacher by external id, fetching and upserting the
/// profile on first encounter. Known teachers are not re-fetched.
///
/// # Errors
///
/// [`TalkError::MissingTeacherId`] if the listing carried no teacher id;
/// [`TalkError::Teacher`] if the lookup, fetch or upsert fails.
pub async fn resolve_teacher(
    source: &dyn CatalogSource,
    store: &dyn CatalogStore,
    talk: &ScrapedTalk,
) -> Result<ResolvedTeacher, TalkError> {
    let Some(teacher_id) = talk.teacher_id else {
        tracing::warn!(
            talk_id = talk.talk_id,
            teacher = %talk.teacher,
            teacher_url = ?talk.teacher_url,
            "no teacher id found for talk"
        );
        return Err(TalkError::MissingTeacherId {
            teacher: talk.teacher.clone(),
        });
    };
    let failed = |message: String| TalkError::Teacher {
        teacher_id,
        name: talk.teacher.clone(),
        message,
    };

    if let Some(id) = store
        .find_teacher(teacher_id)
        .await
        .map_err(|e| failed(e.to_string()))?
    {
        return Ok(ResolvedTeacher {
            id,
            upserted: false,
        });
    }

    let mut profile = source
        .teacher(teacher_id)
        .await
        .map_err(|e| failed(e.to_string()))?;
    if profile.name.is_empty() {
        profile.name.clone_from(&talk.teacher);
    }

    let upsert = store
        .upsert_teacher(&teacher_record(&profile))
        .await
        .map_err(|e| failed(e.to_string()))?;
    tracing::debug!(
        teacher_id,
        id = upsert.id,
        inserted = upsert.inserted,
        "upserted teacher"
    );

    Ok(ResolvedTeacher {
        id: upsert.id,
        upserted: true,
    })
}

/// Upserts the talk's center, keyed by subdomain.
///
/// # Errors
///
/// [`TalkError::Center`] if the upsert fails.
pub async fn resolve_center(
    store: &dyn CatalogStore,
    talk: &ScrapedTalk,
) -> Result<Option<i64>, TalkError> {
    let (Some(subdomain), Some(name)) = (&talk.center_subdomain, &talk.center) else {
        return Ok(None);
    };

    let id = store
        .upsert_center(&CenterRecord::new(subdomain.as_str(), name.as_str()))
        .await
        .map_err(|e| TalkError::Center {
            subdomain: subdomain.clone(),
            name: name.clone(),
            message: e.to_string(),
        })?;
    Ok(Some(id))
}

/// Upserts the talk's retreat, keyed by its numeric id.
///
/// # Errors
///
/// [`TalkError::Retreat`] if the upsert fails.
pub async fn resolve_retreat(
    store: &dyn CatalogStore,
    talk: &ScrapedTalk,
) -> Result<Option<i64>, TalkError> {
    let (Some(retreat_id), Some(title)) = (talk.retreat_id, &talk.retreat) else {
        return Ok(None);
    };

    let id = store
        .upsert_retreat(&RetreatRecord::new(retreat_id, title.as_str()))
        .await
        .map_err(|e| TalkError::Retreat {
            retreat_id,
            title: title.clone(),
            message: e.to_string(),
        })?;
    Ok(Some(id))
}
