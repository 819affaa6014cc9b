use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ScrapeError;
use crate::results::{PageRecord, Progress, RunResults};

pub const PROGRESS_FILE: &str = "progress.json";
pub const RESULTS_FILE: &str = "results.json";

/// Writes the run's JSON records under the output directory.
///
/// Every write goes to a dot-prefixed temp file in the same directory and is
/// renamed into place, so an interrupted run never leaves a half-written
/// record behind.
#[derive(Debug)]
pub struct OutputStore {
    dir: PathBuf,
}

impl OutputStore {
    /// Create the output directory (and the store over it)
    pub fn create(dir: &Path) -> Result<Self, ScrapeError> {
        fs::create_dir_all(dir).map_err(|source| ScrapeError::Storage {
            path: dir.to_path_buf(),
            source,
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Filename for the page record at the given sequence index
    pub fn page_file_name(index: usize) -> String {
        format!("page_{index}.json")
    }

    /// Write one page record; returns the filename it landed in
    pub fn write_page(&self, record: &PageRecord) -> Result<String, ScrapeError> {
        let name = Self::page_file_name(record.index);
        self.write_json(&name, record)?;
        Ok(name)
    }

    /// Overwrite the progress record
    pub fn write_progress(&self, progress: &Progress) -> Result<(), ScrapeError> {
        self.write_json(PROGRESS_FILE, progress)
    }

    /// Write the final results record
    pub fn write_results(&self, results: &RunResults) -> Result<(), ScrapeError> {
        self.write_json(RESULTS_FILE, results)
    }

    fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<(), ScrapeError> {
        let json = serde_json::to_vec_pretty(value)?;
        let path = self.dir.join(name);
        let tmp = self.dir.join(format!(".{name}.tmp"));

        fs::write(&tmp, &json).map_err(|source| ScrapeError::Storage {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| ScrapeError::Storage { path, source })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractionMode;
    use crate::parsers::ParseResult;
    use crate::results::RunStatus;

    fn sample_record(index: usize) -> PageRecord {
        let parsed = ParseResult::content_only("some page text".to_string());
        PageRecord::from_parse(index, "https://example.com", &parsed, false)
    }

    #[test]
    fn test_write_page_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = OutputStore::create(dir.path()).unwrap();

        let name = store.write_page(&sample_record(1)).unwrap();
        assert_eq!(name, "page_1.json");

        let raw = std::fs::read_to_string(dir.path().join(&name)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["index"], 1);
        assert_eq!(value["url"], "https://example.com");
        assert_eq!(value["text"], "some page text");
        // no stray temp file left behind
        assert!(!dir.path().join(".page_1.json.tmp").exists());
    }

    #[test]
    fn test_progress_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = OutputStore::create(dir.path()).unwrap();

        for pages_done in 1..=3 {
            store
                .write_progress(&Progress {
                    pages_done,
                    status: RunStatus::Running,
                    job_id: Some("job-1".to_string()),
                })
                .unwrap();
        }

        let raw = std::fs::read_to_string(dir.path().join(PROGRESS_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["pages_done"], 3);
        assert_eq!(value["status"], "running");
        assert_eq!(value["job_id"], "job-1");
    }

    #[test]
    fn test_write_results() {
        let dir = tempfile::tempdir().unwrap();
        let store = OutputStore::create(dir.path()).unwrap();

        store
            .write_results(&RunResults {
                status: RunStatus::Completed,
                pages: 2,
                job_id: None,
                extraction_mode: ExtractionMode::Full,
                page_files: vec!["page_1.json".to_string(), "page_2.json".to_string()],
                skipped: 1,
                elapsed_secs: 0.5,
            })
            .unwrap();

        let raw = std::fs::read_to_string(dir.path().join(RESULTS_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["status"], "completed");
        assert_eq!(value["pages"], 2);
        assert_eq!(value["skipped"], 1);
        assert_eq!(value["page_files"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_create_fails_on_unwritable_parent() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();

        let err = OutputStore::create(&blocker.join("out")).unwrap_err();
        assert!(matches!(err, ScrapeError::Storage { .. }));
    }
}
