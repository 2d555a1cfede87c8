use super::DharmaSeedClient;
use crate::error::ScraperError;
use crate::parse::parse_talks;
use crate::types::ScrapedTalk;
use crate::urls::talks_page_url;

impl DharmaSeedClient {
    /// Fetches and parses one page of the talk listing, newest first.
    ///
    /// An empty vector means the listing has no more talks.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`] / [`ScraperError::UnexpectedStatus`] once the
    ///   page retry policy is exhausted.
    /// - [`ScraperError::NotFound`] on 404 (not retried).
    pub async fn fetch_talks_page(&self, page: u32) -> Result<Vec<ScrapedTalk>, ScraperError> {
        let url = talks_page_url(&self.base_url, page);
        let html = self.get_html(&url, &self.page_retry).await?;
        let talks = parse_talks(&html)?;
        tracing::debug!(page, talks = talks.len(), "parsed talk listing page");
        Ok(talks)
    }
}
