use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("page not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid CSS selector \"{selector}\": {reason}")]
    Selector { selector: String, reason: String },

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("unreadable feed for retreat {retreat_id}: {reason}")]
    Feed { retreat_id: i64, reason: String },
}

impl ScraperError {
    /// Returns `true` if the error is transient and the request is worth
    /// repeating after a backoff delay.
    ///
    /// Network failures, HTTP 429 and 5xx are transient. A 404, any other
    /// status, and markup problems are not: repeating the request returns the
    /// same answer.
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::UnexpectedStatus { status, .. } => *status == 429 || *status >= 500,
            Self::NotFound { .. }
            | Self::Selector { .. }
            | Self::InvalidUrl { .. }
            | Self::Feed { .. } => false,
        }
    }
}
