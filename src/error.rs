use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while configuring or running a scrape
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Required configuration is missing or unusable
    #[error("configuration error: {0}")]
    Config(String),

    /// The target URL (or a discovered link base) could not be parsed
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A user-supplied include/exclude pattern failed to compile
    #[error("invalid filter pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The HTTP request itself failed (connect, timeout, body read)
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("unexpected status {status} fetching {url}")]
    Status { url: String, status: u16 },

    /// Output directory or record file could not be written
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record failed to serialize to JSON
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ScrapeError {
    /// True for errors that mean the fetch of a single page failed,
    /// as opposed to a broken configuration or output directory.
    pub fn is_fetch_error(&self) -> bool {
        matches!(self, ScrapeError::Fetch { .. } | ScrapeError::Status { .. })
    }
}
