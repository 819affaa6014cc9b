// Re-export modules
pub mod args;
pub mod config;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod parsers;
pub mod results;
pub mod runner;
pub mod status;
pub mod store;

// Re-export commonly used types for convenience
pub use config::{ContentTypes, ExtractionMode, ScrapeConfig};
pub use error::ScrapeError;
pub use results::{PageRecord, Progress, RunResults, RunStatus};

use std::path::PathBuf;

use fetch::HttpFetcher;
use runner::Runner;

/// Builder for a scrape run.
///
/// Wires the HTTP fetcher and the sequential run loop over a configuration;
/// every output record lands under the configured output directory.
///
/// ```no_run
/// # async fn demo() -> Result<(), snap_page::ScrapeError> {
/// let results = snap_page::Scraper::new("https://example.com")
///     .with_max_pages(5)
///     .with_mode(snap_page::ExtractionMode::Full)
///     .run()
///     .await?;
/// println!("scraped {} pages", results.pages);
/// # Ok(())
/// # }
/// ```
pub struct Scraper {
    config: ScrapeConfig,
}

impl Scraper {
    /// Create a scraper for the given target URL with default settings
    pub fn new(target_url: &str) -> Self {
        Self {
            config: ScrapeConfig::new(target_url),
        }
    }

    /// Create a scraper from an already-built configuration
    pub fn from_config(config: ScrapeConfig) -> Self {
        Self { config }
    }

    /// Set the correlation id echoed into output records
    pub fn with_job_id(mut self, job_id: &str) -> Self {
        self.config.job_id = Some(job_id.to_string());
        self
    }

    /// Set the hard ceiling on page records
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.config.max_pages = max_pages;
        self
    }

    /// Set the directory output records are written under
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    /// Set whether to follow discovered links
    pub fn with_mode(mut self, mode: ExtractionMode) -> Self {
        self.config.extraction_mode = mode;
        self
    }

    /// Set the content sections extracted from each page
    pub fn with_content_types(mut self, types: ContentTypes) -> Self {
        self.config.content_types = types;
        self
    }

    /// Run the scrape to completion and return the summary
    pub async fn run(self) -> Result<RunResults, ScrapeError> {
        let fetcher = HttpFetcher::new(&self.config)?;
        let runner = Runner::new(self.config, fetcher)?;
        runner.run().await
    }
}
