use super::DharmaSeedClient;
use crate::error::ScraperError;
use crate::parse::parse_retreat_feed;
use crate::types::ScrapedRetreatFeed;
use crate::urls::retreat_feed_url;

impl DharmaSeedClient {
    /// Fetches and parses one retreat's RSS feed.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::NotFound`] if the retreat has no feed.
    /// - [`ScraperError::Feed`] if the body is not a feed.
    /// - [`ScraperError::Http`] / [`ScraperError::UnexpectedStatus`] once the
    ///   retry policy is exhausted.
    pub async fn fetch_retreat_feed(
        &self,
        retreat_id: i64,
    ) -> Result<ScrapedRetreatFeed, ScraperError> {
        let url = retreat_feed_url(&self.base_url, retreat_id);
        let xml = self.get_html(&url, &self.retry).await?;
        let feed = parse_retreat_feed(&xml, retreat_id)?;
        tracing::debug!(retreat_id, talks = feed.talk_ids.len(), "parsed retreat feed");
        Ok(feed)
    }
}
