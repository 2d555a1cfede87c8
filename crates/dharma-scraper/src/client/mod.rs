//! HTTP client for the Dharma Seed website.

mod retreats;
mod talks;
mod teachers;

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::ScraperError;
use crate::retry::{retry_with_backoff_if, RetryPolicy};

/// Client for the public Dharma Seed HTML pages.
///
/// Use [`DharmaSeedClient::from_app_config`] in binaries or
/// [`DharmaSeedClient::with_base_url`] to point at a mock server in tests.
///
/// Every request is retried on transient failures (network errors, 429,
/// 5xx). Listing pages use `page_retry`; single-teacher requests use `retry`.
/// A 404 is never retried.
pub struct DharmaSeedClient {
    client: Client,
    /// Origin without a trailing slash.
    base_url: String,
    retry: RetryPolicy,
    page_retry: RetryPolicy,
}

impl DharmaSeedClient {
    /// Creates a client pointed at the production site.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        retry: RetryPolicy,
        page_retry: RetryPolicy,
    ) -> Result<Self, ScraperError> {
        Self::with_base_url(
            dharma_core::DHARMA_SEED_BASE_URL,
            timeout_secs,
            user_agent,
            retry,
            page_retry,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if `base_url` is not an absolute
    /// `http(s)` URL, or [`ScraperError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        retry: RetryPolicy,
        page_retry: RetryPolicy,
    ) -> Result<Self, ScraperError> {
        let parsed = Url::parse(base_url).map_err(|e| ScraperError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ScraperError::InvalidUrl {
                url: base_url.to_owned(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            retry,
            page_retry,
        })
    }

    /// Builds a client from the process configuration.
    ///
    /// # Errors
    ///
    /// See [`DharmaSeedClient::with_base_url`].
    pub fn from_app_config(config: &dharma_core::AppConfig) -> Result<Self, ScraperError> {
        Self::with_base_url(
            &config.source_base_url,
            config.scraper_request_timeout_secs,
            &config.scraper_user_agent,
            RetryPolicy::from_app_config(config),
            RetryPolicy::pages_from_app_config(config),
        )
    }

    /// The origin requests are sent to, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GETs `url` and returns the body, retrying transient failures under
    /// `policy`.
    async fn get_html(&self, url: &str, policy: &RetryPolicy) -> Result<String, ScraperError> {
        retry_with_backoff_if(policy, ScraperError::is_retriable, || {
            let url = url.to_owned();
            async move {
                tracing::debug!(url = %url, "GET");
                let response = self.client.get(&url).send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(ScraperError::NotFound { url });
                }
                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                Ok(response.text().await?)
            }
        })
        .await
    }
}
