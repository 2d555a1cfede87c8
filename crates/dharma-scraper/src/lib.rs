pub mod client;
pub mod error;
pub mod normalize;
pub mod parse;
pub mod retry;
pub mod types;
pub mod urls;

pub use client::DharmaSeedClient;
pub use error::ScraperError;
pub use normalize::{parse_duration_secs, parse_recorded_on, retreat_details, teacher_record};
pub use parse::{parse_retreat_feed, parse_talks, parse_teacher, parse_teachers};
pub use retry::{retry_with_backoff, retry_with_backoff_if, RetryPolicy};
pub use types::{ScrapedRetreatFeed, ScrapedTalk, ScrapedTeacher};
