//! Structured status lines on stdout for an external job panel.
//!
//! This is an interface, not logging; diagnostics go through `log`.

use chrono::Utc;
use serde_json::json;

use crate::config::ScrapeConfig;
use crate::results::RunResults;

/// Marker line preceding the results JSON so a log-scraping caller can
/// recover the summary from stdout
pub const RESULTS_MARKER: &str = "---SCRAPER_RESULTS---";

/// Emit a JSON log line tagged with the job id
pub fn emit(job_id: Option<&str>, level: &str, message: &str) {
    let line = json!({
        "job_id": job_id.unwrap_or("unknown"),
        "level": level,
        "message": message,
        "timestamp": Utc::now().to_rfc3339(),
    });
    println!("{line}");
}

/// Announce the run before the first fetch
pub fn starting(config: &ScrapeConfig) {
    let line = json!({
        "job_id": config.job_id.as_deref().unwrap_or("unknown"),
        "status": "starting",
        "target_url": config.target_url,
        "extraction_mode": config.extraction_mode,
    });
    println!("{line}");
}

/// Report a fatal failure; the caller exits non-zero afterwards
pub fn fatal(message: &str) {
    let line = json!({
        "status": "error",
        "message": message,
    });
    println!("{line}");
}

/// Print the results marker and the run summary
pub fn results(results: &RunResults) {
    println!("{RESULTS_MARKER}");
    match serde_json::to_string(results) {
        Ok(json) => println!("{json}"),
        Err(e) => ::log::error!("Failed to serialize results for stdout: {}", e),
    }
}
