//! Dharma Seed catalog sync pipeline.
//!
//! Crawls talk and teacher listings, drops talks the store already knows,
//! resolves each new talk's teacher, center and retreat, and upserts the
//! talk. Stored retreats can then be enriched from their RSS feeds.
//! Item-level failures are recorded in [`SyncStats`]; only a listing page
//! that cannot be fetched aborts a run.

pub mod batch;
pub mod command;
pub mod dedup;
pub mod error;
pub mod options;
pub mod resolve;
pub mod retreats;
pub mod source;
pub mod stats;
pub mod store;
pub mod talk;
pub mod talks;
pub mod teachers;

pub use batch::process_batch;
pub use command::{run_sync_command, CommandResult, SyncCommand, SyncReport};
pub use dedup::filter_new_talks;
pub use error::{RetreatFeedError, SyncError, TalkError};
pub use options::SyncOptions;
pub use retreats::sync_retreats;
pub use source::CatalogSource;
pub use stats::{EntityStats, EntitySummary, FailedItem, SyncStats, SyncSummary};
pub use store::{CatalogStore, PgCatalogStore};
pub use talk::{process_talk, talk_record, TalkReport};
pub use talks::sync_talks;
pub use teachers::sync_teachers;
