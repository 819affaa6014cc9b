use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ScrapeError;

/// Configuration for a scrape run
///
/// Built once at startup (from the environment, a file, or the `Scraper`
/// builder) and never re-read while the run is in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Entry-point URL the scrape starts from
    pub target_url: String,

    /// Opaque correlation id supplied by an external caller, echoed into
    /// every output record
    #[serde(default)]
    pub job_id: Option<String>,

    /// Hard ceiling on the number of page records produced
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Directory all JSON records are written under
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Whether to scrape just the target page or follow discovered links
    #[serde(default)]
    pub extraction_mode: ExtractionMode,

    /// Which content sections to extract from each page
    #[serde(default)]
    pub content_types: ContentTypes,

    /// Optional URL to POST the run summary to on completion
    #[serde(default)]
    pub callback_url: Option<String>,

    /// Whether discovered links may leave the target's domain
    #[serde(default)]
    pub allow_external: bool,

    /// Regex patterns for links to include
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns for links to exclude
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Per-page fetch timeout in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl ScrapeConfig {
    /// Create a configuration with default values for everything but the target
    pub fn new(target_url: &str) -> Self {
        Self {
            target_url: target_url.to_string(),
            job_id: None,
            max_pages: default_max_pages(),
            output_dir: default_output_dir(),
            extraction_mode: ExtractionMode::default(),
            content_types: ContentTypes::default(),
            callback_url: None,
            allow_external: false,
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScrapeError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ScrapeError::Storage {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The page ceiling actually applied by the run loop.
    ///
    /// Single mode scrapes exactly the target page regardless of `max_pages`.
    pub fn effective_max_pages(&self) -> usize {
        match self.extraction_mode {
            ExtractionMode::Single => 1,
            ExtractionMode::Full => self.max_pages,
        }
    }
}

/// How far a run follows the page graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    /// Scrape only the target page
    #[default]
    Single,
    /// Follow discovered links up to `max_pages`
    Full,
}

/// Toggles for the content sections extracted from each page
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ContentTypes {
    #[serde(default = "default_true")]
    pub text: bool,
    #[serde(default = "default_true")]
    pub images: bool,
    #[serde(default = "default_true")]
    pub code: bool,
    #[serde(default)]
    pub links: bool,
    #[serde(default = "default_true")]
    pub json: bool,
    #[serde(default = "default_true")]
    pub tables: bool,
    #[serde(default = "default_true")]
    pub media: bool,
    #[serde(default)]
    pub files: bool,
}

impl Default for ContentTypes {
    fn default() -> Self {
        Self {
            text: true,
            images: true,
            code: true,
            links: false,
            json: true,
            tables: true,
            media: true,
            files: false,
        }
    }
}

impl ContentTypes {
    /// Parse the toggle set from a JSON object string, falling back to the
    /// defaults when the string is malformed or empty.
    pub fn from_json_lenient(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(types) => types,
            Err(e) => {
                ::log::warn!("Ignoring malformed content type toggles: {}", e);
                Self::default()
            }
        }
    }
}

/// Default ceiling on pages per run
fn default_max_pages() -> usize {
    10
}

/// Default output directory
fn default_output_dir() -> PathBuf {
    std::env::temp_dir().join("snap-page")
}

/// Default per-page fetch timeout
fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScrapeConfig::new("https://example.com");
        assert_eq!(config.max_pages, 10);
        assert_eq!(config.extraction_mode, ExtractionMode::Single);
        assert!(config.job_id.is_none());
        assert!(!config.allow_external);
        assert_eq!(config.fetch_timeout_secs, 30);
    }

    #[test]
    fn test_single_mode_caps_at_one_page() {
        let mut config = ScrapeConfig::new("https://example.com");
        config.max_pages = 50;
        assert_eq!(config.effective_max_pages(), 1);

        config.extraction_mode = ExtractionMode::Full;
        assert_eq!(config.effective_max_pages(), 50);
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = ScrapeConfig::from_json(
            r#"{"target_url": "https://example.com/docs", "max_pages": 3}"#,
        )
        .unwrap();
        assert_eq!(config.target_url, "https://example.com/docs");
        assert_eq!(config.max_pages, 3);
        assert_eq!(config.extraction_mode, ExtractionMode::Single);
        assert!(config.content_types.text);
        assert!(!config.content_types.links);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scrape.json");
        std::fs::write(
            &path,
            r#"{"target_url": "https://example.com", "extraction_mode": "full"}"#,
        )
        .unwrap();

        let config = ScrapeConfig::from_file(&path).unwrap();
        assert_eq!(config.target_url, "https://example.com");
        assert_eq!(config.extraction_mode, ExtractionMode::Full);

        let missing = ScrapeConfig::from_file(dir.path().join("absent.json"));
        assert!(matches!(missing, Err(ScrapeError::Storage { .. })));

        std::fs::write(&path, "not json").unwrap();
        let malformed = ScrapeConfig::from_file(&path);
        assert!(matches!(malformed, Err(ScrapeError::Serialize(_))));
    }

    #[test]
    fn test_content_types_lenient_parse() {
        let types = ContentTypes::from_json_lenient(r#"{"text": false, "links": true}"#);
        assert!(!types.text);
        assert!(types.links);
        // unspecified toggles keep their defaults
        assert!(types.images);
        assert!(!types.files);

        let fallback = ContentTypes::from_json_lenient("not json");
        assert!(fallback.text);
        assert!(!fallback.links);
    }
}
