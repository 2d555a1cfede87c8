//! URL builders for the Dharma Seed pages the sync pipeline reads.
//!
//! `base` is an origin without a trailing slash, e.g. `https://dharmaseed.org`.

/// Listing rows requested per page.
pub const PAGE_ITEMS: u32 = 100;

/// Talk listing page `page` (1-based), newest recordings first.
#[must_use]
pub fn talks_page_url(base: &str, page: u32) -> String {
    format!("{base}/talks/?page={page}&search=&sort=-rec_date&page_items={PAGE_ITEMS}")
}

/// Teacher detail page.
#[must_use]
pub fn teacher_url(base: &str, teacher_id: i64) -> String {
    format!("{base}/teacher/{teacher_id}")
}

/// Teacher list page `page` (1-based).
#[must_use]
pub fn teachers_page_url(base: &str, page: u32) -> String {
    format!("{base}/teachers/?page={page}&page_items={PAGE_ITEMS}")
}

/// RSS feed of one retreat.
#[must_use]
pub fn retreat_feed_url(base: &str, retreat_id: i64) -> String {
    format!("{base}/feeds/retreat/{retreat_id}/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn talks_page_url_sorts_newest_first() {
        assert_eq!(
            talks_page_url("https://dharmaseed.org", 3),
            "https://dharmaseed.org/talks/?page=3&search=&sort=-rec_date&page_items=100"
        );
    }

    #[test]
    fn teacher_urls() {
        assert_eq!(
            teacher_url("https://dharmaseed.org", 96),
            "https://dharmaseed.org/teacher/96"
        );
        assert_eq!(
            teachers_page_url("http://127.0.0.1:8080", 1),
            "http://127.0.0.1:8080/teachers/?page=1&page_items=100"
        );
    }

    #[test]
    fn retreat_feed_url_keeps_trailing_slash() {
        assert_eq!(
            retreat_feed_url("https://dharmaseed.org", 4521),
            "https://dharmaseed.org/feeds/retreat/4521/"
        );
    }
}
