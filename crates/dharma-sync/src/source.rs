//! Where listings come from. Implemented by [`DharmaSeedClient`]; tests
//! substitute canned pages.

use async_trait::async_trait;
use dharma_scraper::{
    DharmaSeedClient, ScrapedRetreatFeed, ScrapedTalk, ScrapedTeacher, ScraperError,
};

#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Origin used to absolutize site-relative links.
    fn base_url(&self) -> &str;

    /// One page of the talk listing, newest first. Empty past the end.
    async fn talks_page(&self, page: u32) -> Result<Vec<ScrapedTalk>, ScraperError>;

    async fn teacher(&self, teacher_id: i64) -> Result<ScrapedTeacher, ScraperError>;

    /// One page of the teacher list. Empty past the end.
    async fn teachers_page(&self, page: u32) -> Result<Vec<ScrapedTeacher>, ScraperError>;

    async fn retreat_feed(&self, retreat_id: i64) -> Result<ScrapedRetreatFeed, ScraperError>;
}

#[async_trait]
impl CatalogSource for DharmaSeedClient {
    fn base_url(&self) -> &str {
        DharmaSeedClient::base_url(self)
    }

    async fn talks_page(&self, page: u32) -> Result<Vec<ScrapedTalk>, ScraperError> {
        self.fetch_talks_page(page).await
    }

    async fn teacher(&self, teacher_id: i64) -> Result<ScrapedTeacher, ScraperError> {
        self.fetch_teacher(teacher_id).await
    }

    async fn teachers_page(&self, page: u32) -> Result<Vec<ScrapedTeacher>, ScraperError> {
        self.fetch_teachers_page(page).await
    }

    async fn retreat_feed(&self, retreat_id: i64) -> Result<ScrapedRetreatFeed, ScraperError> {
        self.fetch_retreat_feed(retreat_id).await
    }
}
