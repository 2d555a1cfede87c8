use super::DharmaSeedClient;
use crate::error::ScraperError;
use crate::parse::{parse_teacher, parse_teachers};
use crate::types::ScrapedTeacher;
use crate::urls::{teacher_url, teachers_page_url};

impl DharmaSeedClient {
    /// Fetches and parses a single teacher's detail page.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::NotFound`] if the teacher page does not exist.
    /// - [`ScraperError::Http`] / [`ScraperError::UnexpectedStatus`] once the
    ///   retry policy is exhausted.
    pub async fn fetch_teacher(&self, teacher_id: i64) -> Result<ScrapedTeacher, ScraperError> {
        let url = teacher_url(&self.base_url, teacher_id);
        let html = self.get_html(&url, &self.retry).await?;
        parse_teacher(&html, teacher_id)
    }

    /// Fetches and parses one page of the teacher list.
    ///
    /// An empty vector means the list has no more teachers.
    ///
    /// # Errors
    ///
    /// Same as [`DharmaSeedClient::fetch_talks_page`].
    pub async fn fetch_teachers_page(&self, page: u32) -> Result<Vec<ScrapedTeacher>, ScraperError> {
        let url = teachers_page_url(&self.base_url, page);
        let html = self.get_html(&url, &self.page_retry).await?;
        let teachers = parse_teachers(&html)?;
        tracing::debug!(page, teachers = teachers.len(), "parsed teacher list page");
        Ok(teachers)
    }
}
