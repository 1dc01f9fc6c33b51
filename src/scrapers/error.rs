use thiserror::Error;

/// Failures raised while driving a page or reading listings off it
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Timeout or network error loading a URL
    #[error("failed to load {url}: {reason}")]
    Navigation { url: String, reason: String },

    /// Markup for one element could not be turned into a listing
    #[error("extraction failed: {reason}")]
    Extraction { reason: String },

    /// The browser engine itself misbehaved (launch, tab, script evaluation)
    #[error("browser error: {0}")]
    Browser(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl ScrapeError {
    pub fn navigation(url: &str, reason: impl ToString) -> Self {
        ScrapeError::Navigation {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn extraction(reason: impl ToString) -> Self {
        ScrapeError::Extraction {
            reason: reason.to_string(),
        }
    }
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;
