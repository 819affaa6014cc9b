use std::collections::{HashSet, VecDeque};
use std::time::Instant;
use url::Url;

use crate::config::{ExtractionMode, ScrapeConfig};
use crate::error::ScrapeError;
use crate::fetch::PageFetcher;
use crate::filter::LinkFilter;
use crate::parsers::{Parser, ParserType};
use crate::results::{PageRecord, Progress, RunResults, RunStatus};
use crate::store::OutputStore;

/// Sequential scrape loop: fetch, parse, persist, update progress, repeat.
///
/// One actor, one page at a time. The loop ends when the page ceiling is
/// reached or no further links are discoverable.
///
/// Failure policy: an unreachable target (first fetch) is fatal and leaves a
/// best-effort error progress record. Later per-page fetch failures are
/// logged, counted as skipped, and excluded from the page count, so page
/// indices stay contiguous over successful pages.
pub struct Runner<F> {
    config: ScrapeConfig,
    target: Url,
    fetcher: F,
    filter: LinkFilter,
    store: OutputStore,
}

impl<F: PageFetcher> Runner<F> {
    pub fn new(config: ScrapeConfig, fetcher: F) -> Result<Self, ScrapeError> {
        let target = Url::parse(&config.target_url)?;
        let filter = LinkFilter::for_target(&target, &config)?;
        let store = OutputStore::create(&config.output_dir)?;
        Ok(Self {
            config,
            target,
            fetcher,
            filter,
            store,
        })
    }

    /// Run the loop to completion and write the results record.
    ///
    /// On error, a progress record with `status: error` is attempted before
    /// the error is returned; no results record is written.
    pub async fn run(&self) -> Result<RunResults, ScrapeError> {
        match self.run_loop().await {
            Ok(results) => Ok(results),
            Err((pages_done, e)) => {
                let _ = self.store.write_progress(&Progress {
                    pages_done,
                    status: RunStatus::Error,
                    job_id: self.config.job_id.clone(),
                });
                Err(e)
            }
        }
    }

    async fn run_loop(&self) -> Result<RunResults, (usize, ScrapeError)> {
        let start = Instant::now();
        let limit = self.config.effective_max_pages();
        let job_id = self.config.job_id.clone();

        let mut queue = VecDeque::new();
        let mut seen = HashSet::new();
        queue.push_back(self.config.target_url.clone());
        seen.insert(self.config.target_url.clone());
        seen.insert(self.filter.normalize(&self.target).to_string());

        let mut pages_done = 0usize;
        let mut skipped = 0usize;
        let mut attempts = 0usize;
        let mut page_files = Vec::new();

        while pages_done < limit {
            let Some(url) = queue.pop_front() else { break };
            attempts += 1;

            let fetched = match self.fetcher.fetch(&url).await {
                Ok(fetched) => fetched,
                Err(e) if attempts == 1 => {
                    // Target unreachable is a configuration-level failure
                    ::log::error!("Target URL unreachable: {}", e);
                    return Err((0, e));
                }
                Err(e) => {
                    ::log::warn!("Skipping {}: {}", url, e);
                    skipped += 1;
                    continue;
                }
            };

            let parser_type = ParserType::from_url(&url);
            let parsed = Parser::parse(&fetched.body, parser_type, &self.config.content_types);

            let index = pages_done + 1;
            let record =
                PageRecord::from_parse(index, &url, &parsed, self.config.content_types.links);
            let name = self
                .store
                .write_page(&record)
                .map_err(|e| (pages_done, e))?;
            pages_done = index;
            page_files.push(name);

            self.store
                .write_progress(&Progress {
                    pages_done,
                    status: RunStatus::Running,
                    job_id: job_id.clone(),
                })
                .map_err(|e| (pages_done, e))?;

            ::log::info!("Scraped page {} of {}: {}", pages_done, limit, url);

            if self.config.extraction_mode == ExtractionMode::Full
                && parser_type.should_extract_links()
                && pages_done < limit
            {
                self.enqueue_links(&url, &parsed.links, &mut queue, &mut seen);
            }
        }

        let results = RunResults {
            status: RunStatus::Completed,
            pages: pages_done,
            job_id: job_id.clone(),
            extraction_mode: self.config.extraction_mode,
            page_files,
            skipped,
            elapsed_secs: start.elapsed().as_secs_f64(),
        };

        self.store
            .write_results(&results)
            .map_err(|e| (pages_done, e))?;
        self.store
            .write_progress(&Progress {
                pages_done,
                status: RunStatus::Completed,
                job_id,
            })
            .map_err(|e| (pages_done, e))?;

        Ok(results)
    }

    /// Resolve links against their page, filter them, and queue the unseen ones
    fn enqueue_links(
        &self,
        base: &str,
        links: &[String],
        queue: &mut VecDeque<String>,
        seen: &mut HashSet<String>,
    ) {
        let Ok(base_url) = Url::parse(base) else {
            return;
        };
        for link in links {
            let Ok(resolved) = base_url.join(link) else {
                ::log::debug!("Ignoring unresolvable link: {}", link);
                continue;
            };
            if !self.filter.accept(&resolved) {
                ::log::debug!("Link filter rejected: {}", resolved);
                continue;
            }
            let normalized = self.filter.normalize(&resolved).to_string();
            if seen.insert(normalized.clone()) {
                ::log::debug!("Queuing link: {}", normalized);
                queue.push_back(normalized);
            }
        }
    }
}
