use dharma_db::DbError;
use dharma_scraper::ScraperError;
use thiserror::Error;

/// Run-level failures. Any of these aborts the sync.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to fetch {listing} page {page}: {source}")]
    PageFetch {
        listing: &'static str,
        page: u32,
        #[source]
        source: ScraperError,
    },

    #[error("failed to check known talks on page {page}: {source}")]
    Dedup {
        page: u32,
        #[source]
        source: DbError,
    },

    #[error("failed to list stored retreats: {0}")]
    RetreatList(#[source] DbError),
}

/// Why one retreat's feed could not be applied.
#[derive(Debug, Error)]
pub enum RetreatFeedError {
    #[error(transparent)]
    Feed(#[from] ScraperError),

    #[error(transparent)]
    Store(#[from] DbError),

    #[error("retreat is no longer stored")]
    Missing,
}

/// Why a single talk could not be ingested, tagged with the stage that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TalkError {
    #[error("no teacher id in listing for teacher '{teacher}'")]
    MissingTeacherId { teacher: String },

    #[error("teacher {teacher_id} ({name}): {message}")]
    Teacher {
        teacher_id: i64,
        name: String,
        message: String,
    },

    #[error("center '{subdomain}' ({name}): {message}")]
    Center {
        subdomain: String,
        name: String,
        message: String,
    },

    #[error("retreat {retreat_id} ({title}): {message}")]
    Retreat {
        retreat_id: i64,
        title: String,
        message: String,
    },

    #[error("talk upsert failed: {message}")]
    Talk { message: String },
}
