//! Parsers for Dharma Seed listing pages, detail pages and feeds.
//!
//! All site-specific markup knowledge lives here. Parsers are pure: the same
//! HTML always yields the same records, in document order. A malformed row is
//! dropped with a warning rather than failing the page.

mod helpers;
mod retreat_feed;
mod talks;
mod teachers;

pub use retreat_feed::parse_retreat_feed;
pub use talks::parse_talks;
pub use teachers::{parse_teacher, parse_teachers};
