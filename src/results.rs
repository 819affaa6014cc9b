use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ExtractionMode;
use crate::parsers::{CodeBlock, FileRef, ImageRef, MediaRef, ParseResult, TableData};

/// Lifecycle state recorded in progress and results files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Completed,
    Error,
}

/// Persisted snapshot of one fetched page (`page_<index>.json`, write-once)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    /// 1-based sequence index, contiguous over successful pages
    pub index: usize,

    /// URL the page was fetched from
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub fetched_at: DateTime<Utc>,

    /// Extracted text content
    pub text: String,

    /// Length of the extracted text before truncation
    pub text_length: usize,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageRef>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub code_blocks: Vec<CodeBlock>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<TableData>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub json_ld: Vec<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<MediaRef>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileRef>,
}

impl PageRecord {
    /// Build a record from a parse result.
    ///
    /// `keep_links` controls whether discovered links are persisted in the
    /// record; the runner may still use them for crawling either way.
    pub fn from_parse(index: usize, url: &str, parsed: &ParseResult, keep_links: bool) -> Self {
        Self {
            index,
            url: url.to_string(),
            title: parsed.title.clone(),
            fetched_at: Utc::now(),
            text: parsed.content.clone(),
            text_length: parsed.content_length,
            links: if keep_links {
                parsed.links.clone()
            } else {
                Vec::new()
            },
            images: parsed.images.clone(),
            code_blocks: parsed.code_blocks.clone(),
            tables: parsed.tables.clone(),
            json_ld: parsed.json_ld.clone(),
            media: parsed.media.clone(),
            files: parsed.files.clone(),
        }
    }
}

/// The mutable status of an in-flight run (`progress.json`, overwritten per page)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progress {
    pub pages_done: usize,
    pub status: RunStatus,
    pub job_id: Option<String>,
}

/// Final write-once summary of a run (`results.json`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResults {
    pub status: RunStatus,
    /// Number of page records produced
    pub pages: usize,
    pub job_id: Option<String>,
    pub extraction_mode: ExtractionMode,
    /// Filenames of the page records, in fetch order
    pub page_files: Vec<String>,
    /// Pages whose fetch failed and were skipped
    pub skipped: usize,
    pub elapsed_secs: f64,
}
