use std::time::Duration;

use dharma_scraper::RetryPolicy;

const DEFAULT_PAGE_DELAY_MS: u64 = 1_000;
const DEFAULT_BATCH_SIZE: usize = 10;
const DEFAULT_BATCH_DELAY_MS: u64 = 1_000;

/// Pacing, batching and mode switches for one sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Pause after each listing page before requesting the next.
    pub page_delay: Duration,
    /// Items processed concurrently per batch. `0` is treated as `1`.
    pub batch_size: usize,
    /// Pause between batches of one page.
    pub batch_delay: Duration,
    /// Retry applied around each item in a batch.
    pub item_retry: RetryPolicy,
    /// Stop after this many listing pages.
    pub max_pages: Option<u32>,
    /// Report new talks without ingesting them, and keep crawling past
    /// pages with nothing new.
    pub skip_processing: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            page_delay: Duration::from_millis(DEFAULT_PAGE_DELAY_MS),
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: Duration::from_millis(DEFAULT_BATCH_DELAY_MS),
            item_retry: RetryPolicy::default(),
            max_pages: None,
            skip_processing: false,
        }
    }
}

impl SyncOptions {
    #[must_use]
    pub fn from_app_config(config: &dharma_core::AppConfig) -> Self {
        Self {
            page_delay: Duration::from_millis(config.sync_page_delay_ms),
            batch_size: config.sync_batch_size,
            batch_delay: Duration::from_millis(config.sync_batch_delay_ms),
            item_retry: RetryPolicy::from_app_config(config),
            max_pages: config.sync_max_pages,
            skip_processing: false,
        }
    }

    #[must_use]
    pub fn with_skip_processing(mut self, skip_processing: bool) -> Self {
        self.skip_processing = skip_processing;
        self
    }

    /// Overrides the page limit when `max_pages` is `Some`.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        if max_pages.is_some() {
            self.max_pages = max_pages;
        }
        self
    }

    /// No pauses and no retry backoff.
    #[must_use]
    pub fn without_delays(mut self) -> Self {
        self.page_delay = Duration::ZERO;
        self.batch_delay = Duration::ZERO;
        self.item_retry = RetryPolicy::immediate(self.item_retry.max_attempts);
        self
    }

    pub(crate) fn limit_reached(&self, page: u32) -> bool {
        self.max_pages.is_some_and(|max| page >= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_source_pacing() {
        let options = SyncOptions::default();
        assert_eq!(options.page_delay, Duration::from_secs(1));
        assert_eq!(options.batch_size, 10);
        assert_eq!(options.batch_delay, Duration::from_secs(1));
        assert_eq!(options.item_retry, RetryPolicy::default());
        assert!(options.max_pages.is_none());
        assert!(!options.skip_processing);
    }

    #[test]
    fn max_pages_override_only_when_given() {
        let options = SyncOptions {
            max_pages: Some(5),
            ..SyncOptions::default()
        };
        assert_eq!(options.clone().with_max_pages(None).max_pages, Some(5));
        assert_eq!(options.with_max_pages(Some(2)).max_pages, Some(2));
    }

    #[test]
    fn limit_reached_is_inclusive() {
        let options = SyncOptions::default().with_max_pages(Some(2));
        assert!(!options.limit_reached(1));
        assert!(options.limit_reached(2));
        assert!(!SyncOptions::default().limit_reached(u32::MAX));
    }

    #[test]
    fn without_delays_keeps_attempt_count() {
        let options = SyncOptions::default().without_delays();
        assert_eq!(options.page_delay, Duration::ZERO);
        assert_eq!(options.item_retry.max_attempts, 3);
        assert_eq!(options.item_retry.initial_delay, Duration::ZERO);
    }
}
