use clap::Parser;
use std::process::ExitCode;

use snap_page::args::Args;
use snap_page::{RunResults, Scraper, status};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Resolve configuration from the environment (flags override it)
    let args = Args::parse();
    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            status::fatal(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    status::starting(&config);
    ::log::info!("Starting scrape of {}", config.target_url);

    let job_id = config.job_id.clone();
    let callback_url = config.callback_url.clone();

    match Scraper::from_config(config).run().await {
        Ok(results) => {
            status::emit(
                job_id.as_deref(),
                "info",
                &format!(
                    "Scraped {} pages in {:.2}s ({} skipped)",
                    results.pages, results.elapsed_secs, results.skipped
                ),
            );
            if let Some(url) = callback_url {
                post_callback(&url, &results, job_id.as_deref()).await;
            }
            status::results(&results);
            ExitCode::SUCCESS
        }
        Err(e) => {
            ::log::error!("Scrape failed: {}", e);
            status::fatal(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

/// POST the run summary to the caller's callback endpoint.
///
/// Delivery failure is reported but never fails the run; the records on disk
/// are the source of truth.
async fn post_callback(url: &str, results: &RunResults, job_id: Option<&str>) {
    let client = reqwest::Client::new();
    match client.post(url).json(results).send().await {
        Ok(response) if response.status().is_success() => {
            status::emit(job_id, "info", "Callback delivered");
        }
        Ok(response) => {
            status::emit(
                job_id,
                "warn",
                &format!("Callback returned status {}", response.status()),
            );
        }
        Err(e) => {
            status::emit(job_id, "warn", &format!("Callback failed: {e}"));
        }
    }
}
