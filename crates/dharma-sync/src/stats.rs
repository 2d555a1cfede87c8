//! Per-run counters and the end-of-run summary.
//!
//! A [`SyncStats`] value is owned by one orchestrator call and returned when
//! the run ends. Concurrent items never touch it: their outcomes are folded
//! in by the orchestrator after each batch.

use std::time::Duration;

use dharma_scraper::ScrapedTalk;
use serde::Serialize;

use crate::error::TalkError;
use crate::talk::TalkReport;

/// One item that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedItem {
    /// External identifier: numeric id, or subdomain for centers.
    pub id: String,
    /// Display name or title.
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityStats {
    pub processed: u64,
    pub failed: Vec<FailedItem>,
}

impl EntityStats {
    pub fn record_success(&mut self) {
        self.processed += 1;
    }

    pub fn record_failure(
        &mut self,
        id: impl ToString,
        name: impl Into<String>,
        error: impl Into<String>,
    ) {
        self.failed.push(FailedItem {
            id: id.to_string(),
            name: name.into(),
            error: error.into(),
        });
    }

    /// `processed / (processed + failed) * 100`, rounded to one decimal.
    /// `None` when nothing was attempted.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> Option<f64> {
        let failed = self.failed.len() as u64;
        let total = self.processed + failed;
        if total == 0 {
            return None;
        }
        let rate = self.processed as f64 / total as f64 * 100.0;
        Some((rate * 10.0).round() / 10.0)
    }

    #[must_use]
    pub fn summary(&self) -> EntitySummary {
        EntitySummary {
            processed: self.processed,
            failed: self.failed.len(),
            success_rate: self.success_rate(),
            failure_details: self.failed.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncStats {
    pub talks: EntityStats,
    pub teachers: EntityStats,
    pub centers: EntityStats,
    pub retreats: EntityStats,
    /// Listing pages fetched, including the terminating one.
    pub pages_fetched: u32,
    /// Talks on fetched pages that the store did not know yet.
    pub new_talks_found: u64,
    pub duration: Duration,
}

impl SyncStats {
    /// Folds one talk's final outcome into the counters.
    ///
    /// A successful talk counts as processed for every entity it touched;
    /// the teacher only when this run upserted it. Center and retreat count as
    /// processed even when the talk has none. A failed talk is recorded under
    /// `talks` and, when a resolver failed, under that entity as well.
    pub fn record_talk(&mut self, talk: &ScrapedTalk, outcome: &Result<TalkReport, TalkError>) {
        match outcome {
            Ok(report) => {
                if report.teacher_upserted {
                    self.teachers.record_success();
                }
                self.centers.record_success();
                self.retreats.record_success();
                self.talks.record_success();
            }
            Err(err) => {
                match err {
                    TalkError::MissingTeacherId { .. } => {}
                    TalkError::Teacher {
                        teacher_id,
                        name,
                        message,
                    } => self.teachers.record_failure(teacher_id, name.as_str(), message.as_str()),
                    TalkError::Center {
                        subdomain,
                        name,
                        message,
                    } => self.centers.record_failure(subdomain, name.as_str(), message.as_str()),
                    TalkError::Retreat {
                        retreat_id,
                        title,
                        message,
                    } => {
                        self.centers.record_success();
                        self.retreats
                            .record_failure(retreat_id, title.as_str(), message.as_str());
                    }
                    TalkError::Talk { .. } => {
                        self.centers.record_success();
                        self.retreats.record_success();
                    }
                }
                self.talks
                    .record_failure(talk.talk_id, talk.title.as_str(), err.to_string());
            }
        }
    }

    #[must_use]
    pub fn summary(&self) -> SyncSummary {
        SyncSummary {
            talks: self.talks.summary(),
            teachers: self.teachers.summary(),
            centers: self.centers.summary(),
            retreats: self.retreats.summary(),
            pages_fetched: self.pages_fetched,
            new_talks_found: self.new_talks_found,
            duration_ms: u64::try_from(self.duration.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySummary {
    pub processed: u64,
    pub failed: usize,
    /// Percentage with one decimal; absent when nothing was attempted.
    pub success_rate: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failure_details: Vec<FailedItem>,
}

/// Serializable end-of-run report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncSummary {
    pub talks: EntitySummary,
    pub teachers: EntitySummary,
    pub centers: EntitySummary,
    pub retreats: EntitySummary,
    pub pages_fetched: u32,
    pub new_talks_found: u64,
    pub duration_ms: u64,
}

impl SyncSummary {
    /// Emits the summary as one structured `info` event, then one `warn`
    /// per failed item.
    pub fn log(&self, run: &str) {
        tracing::info!(
            run,
            duration_ms = self.duration_ms,
            pages_fetched = self.pages_fetched,
            new_talks_found = self.new_talks_found,
            talks_processed = self.talks.processed,
            talks_failed = self.talks.failed,
            talks_success_rate = ?self.talks.success_rate,
            teachers_processed = self.teachers.processed,
            teachers_failed = self.teachers.failed,
            teachers_success_rate = ?self.teachers.success_rate,
            centers_processed = self.centers.processed,
            centers_failed = self.centers.failed,
            retreats_processed = self.retreats.processed,
            retreats_failed = self.retreats.failed,
            "sync statistics"
        );
        for (entity, failure) in self.failures() {
            tracing::warn!(
                run,
                entity,
                id = %failure.id,
                name = %failure.name,
                error = %failure.error,
                "sync item failed"
            );
        }
    }

    /// Every recorded failure, tagged with its entity kind.
    pub fn failures(&self) -> impl Iterator<Item = (&'static str, &FailedItem)> {
        [
            ("talk", &self.talks),
            ("teacher", &self.teachers),
            ("center", &self.centers),
            ("retreat", &self.retreats),
        ]
        .into_iter()
        .flat_map(|(entity, summary)| {
            summary
                .failure_details
                .iter()
                .map(move |failure| (entity, failure))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scraped(talk_id: i64, title: &str) -> ScrapedTalk {
        ScrapedTalk {
            talk_id,
            title: title.to_owned(),
            teacher: "Gil Fronsdal".to_owned(),
            teacher_url: Some("/teacher/96/".to_owned()),
            teacher_id: Some(96),
            description: None,
            center: None,
            center_url: None,
            center_subdomain: None,
            retreat: None,
            retreat_url: None,
            retreat_id: None,
            date: "2024-05-01".to_owned(),
            time: "4:56".to_owned(),
            audio_url: None,
        }
    }

    fn report(teacher_upserted: bool) -> TalkReport {
        TalkReport {
            talk_id: 1,
            teacher_id: 1,
            teacher_upserted,
            center_id: None,
            retreat_id: None,
        }
    }

    #[test]
    fn success_rate_rounds_to_one_decimal() {
        let mut stats = EntityStats::default();
        stats.record_success();
        stats.record_success();
        stats.record_failure(3, "c", "boom");
        assert_eq!(stats.success_rate(), Some(66.7));
    }

    #[test]
    fn success_rate_absent_without_attempts() {
        assert_eq!(EntityStats::default().success_rate(), None);
    }

    #[test]
    fn successful_talk_counts_every_entity() {
        let mut stats = SyncStats::default();
        stats.record_talk(&scraped(1, "a"), &Ok(report(true)));
        stats.record_talk(&scraped(2, "b"), &Ok(report(false)));

        assert_eq!(stats.talks.processed, 2);
        assert_eq!(stats.teachers.processed, 1, "only upserted teachers count");
        assert_eq!(stats.centers.processed, 2);
        assert_eq!(stats.retreats.processed, 2);
    }

    #[test]
    fn teacher_failure_is_recorded_twice() {
        let mut stats = SyncStats::default();
        let err = TalkError::Teacher {
            teacher_id: 96,
            name: "Gil Fronsdal".to_owned(),
            message: "page not found".to_owned(),
        };
        stats.record_talk(&scraped(5, "Fifth"), &Err(err));

        assert_eq!(stats.talks.failed.len(), 1);
        assert_eq!(stats.talks.failed[0].id, "5");
        assert_eq!(stats.talks.failed[0].name, "Fifth");
        assert_eq!(stats.teachers.failed.len(), 1);
        assert_eq!(stats.teachers.failed[0].id, "96");
        assert_eq!(stats.centers.processed, 0);
    }

    #[test]
    fn center_failure_is_attributed_to_center() {
        let mut stats = SyncStats::default();
        let err = TalkError::Center {
            subdomain: "imc".to_owned(),
            name: "Insight Meditation Center".to_owned(),
            message: "pool timed out".to_owned(),
        };
        stats.record_talk(&scraped(7, "Seventh"), &Err(err));

        assert_eq!(stats.centers.failed[0].id, "imc");
        assert!(stats.teachers.failed.is_empty());
        assert_eq!(stats.talks.failed.len(), 1);
    }

    #[test]
    fn summary_lists_failures_of_every_entity() {
        let mut stats = SyncStats::default();
        stats.record_talk(
            &scraped(7, "Seventh"),
            &Err(TalkError::Center {
                subdomain: "imc".to_owned(),
                name: "Insight Meditation Center".to_owned(),
                message: "pool timed out".to_owned(),
            }),
        );
        stats.record_talk(
            &scraped(8, "Eighth"),
            &Err(TalkError::Retreat {
                retreat_id: 4521,
                title: "Spring Retreat".to_owned(),
                message: "pool timed out".to_owned(),
            }),
        );

        let summary = stats.summary();
        let failures: Vec<(&str, &str)> = summary
            .failures()
            .map(|(entity, failure)| (entity, failure.id.as_str()))
            .collect();
        assert_eq!(
            failures,
            vec![
                ("talk", "7"),
                ("talk", "8"),
                ("center", "imc"),
                ("retreat", "4521"),
            ]
        );
    }

    #[test]
    fn summary_omits_empty_failure_details() {
        let mut stats = SyncStats::default();
        stats.record_talk(&scraped(1, "a"), &Ok(report(true)));
        stats.duration = Duration::from_millis(1500);

        let json = serde_json::to_value(stats.summary()).expect("summary serializes");
        assert_eq!(json["talks"]["processed"], 1);
        assert_eq!(json["talks"]["success_rate"], 100.0);
        assert!(json["talks"].get("failure_details").is_none());
        assert_eq!(json["duration_ms"], 1500);
    }
}
