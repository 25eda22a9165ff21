//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop. Each iteration:
//! - Takes the next eligible entry from the queue
//! - Resolves the site adapter for its URL
//! - Fetches the page and extracts its article and links
//! - Stores the article and enqueues newly discovered links
//! - Records the resulting status on the entry
//!
//! Per-URL problems never end the run; they only decide the status.

use crate::adapter::{build_http_client, AdapterRegistry, Resolution};
use crate::config::Config;
use crate::crawler::scheduler::Scheduler;
use crate::crawler::shutdown::StopHandle;
use crate::queue::{EntryHandle, Queue};
use crate::state::UrlStatus;
use crate::storage::{open_article_store, ArticleStore};
use crate::Result;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime settings of a [`Crawler`]
#[derive(Debug, Clone)]
pub struct CrawlerOptions {
    /// Minimum spacing between the starts of two visits
    pub crawl_delay: Duration,

    /// Where `finalize` persists the queue; None keeps it in memory only
    pub queue_path: Option<PathBuf>,
}

impl Default for CrawlerOptions {
    fn default() -> Self {
        Self {
            crawl_delay: Duration::from_millis(20),
            queue_path: None,
        }
    }
}

/// Result of visiting one queue entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitReport {
    /// The visited URL
    pub url: String,

    /// Position of the entry in the queue
    pub position: usize,

    /// Status recorded for the entry
    pub status: UrlStatus,

    /// Links that were not queued before this visit
    pub new_links: usize,

    /// Queue length after the visit
    pub queue_len: usize,
}

/// Outcome of a single crawl step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// One entry was visited
    Visited(VisitReport),

    /// No eligible entry is left
    Exhausted,

    /// A stop was requested before or during the visit; the entry, if one
    /// was taken, keeps its status
    Stopped,
}

/// Why [`Crawler::run`] returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The queue ran out of eligible entries
    Exhausted,

    /// A stop was requested
    Stopped,
}

/// Sequential news crawler
///
/// Owns the queue, the adapter registry and the article store. Exactly one
/// page is fetched at a time.
pub struct Crawler {
    queue: Queue,
    registry: AdapterRegistry,
    store: Box<dyn ArticleStore>,
    scheduler: Scheduler,
    stop: StopHandle,
    queue_path: Option<PathBuf>,

    /// Articles stored during this run
    saved_articles: usize,
}

impl Crawler {
    /// Creates a crawler from its collaborators
    pub fn new(
        queue: Queue,
        registry: AdapterRegistry,
        store: Box<dyn ArticleStore>,
        options: CrawlerOptions,
    ) -> Self {
        Self {
            queue,
            registry,
            store,
            scheduler: Scheduler::new(options.crawl_delay),
            stop: StopHandle::new(),
            queue_path: options.queue_path,
            saved_articles: 0,
        }
    }

    /// Creates a crawler as described by the configuration
    ///
    /// Loads the persisted queue when `store-queue` is set, unless `fresh`
    /// asks to start from an empty queue. Opens the configured article store
    /// and builds one adapter per source, all sharing one HTTP client.
    pub fn from_config(config: &Config, fresh: bool) -> Result<Self> {
        let queue_path = config
            .crawler
            .store_queue
            .then(|| PathBuf::from(&config.output.queue_path));

        let queue = match &queue_path {
            Some(path) if !fresh => Queue::load(path)?,
            Some(path) => {
                tracing::info!("Starting fresh, ignoring queue at {}", path.display());
                Queue::new()
            }
            None => Queue::new(),
        };

        let client = build_http_client(&config.user_agent)?;
        let registry = AdapterRegistry::from_config(config, client)?;
        let store = open_article_store(&config.output)?;
        tracing::info!(
            "Article store {} holds {} articles",
            config.output.articles_path,
            store.len()?
        );

        let options = CrawlerOptions {
            crawl_delay: Duration::from_millis(config.crawler.crawl_delay),
            queue_path,
        };

        Ok(Self::new(queue, registry, store, options))
    }

    /// Queues `url` for crawling, returning false if it was already queued
    pub fn add_seed(&mut self, url: &str) -> bool {
        let added = self.queue.enqueue(url);
        if added {
            tracing::info!(url, "Added seed");
        } else {
            tracing::debug!(url, "Seed already queued");
        }
        added
    }

    /// Queues the front page of every source, returning how many were new
    pub fn bootstrap(&mut self) -> usize {
        if self.registry.is_empty() {
            tracing::warn!("No site adapters configured, nothing to bootstrap");
        }

        let front_pages: Vec<String> = self
            .registry
            .iter()
            .map(|adapter| adapter.front_page_url().to_string())
            .collect();

        let added = self.queue.enqueue_all(&front_pages);
        tracing::info!(
            "Bootstrapped {} of {} front pages, queue has {} entries",
            added,
            front_pages.len(),
            self.queue.len()
        );
        added
    }

    /// Requests the run loop to halt before its next visit
    pub fn stop(&self) {
        self.stop.request_stop();
    }

    /// Returns a handle that can request a stop from another task
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Visits entries until the queue is exhausted or a stop is requested
    ///
    /// Only storage and queue defects end the run with an error.
    pub async fn run(&mut self) -> Result<RunOutcome> {
        tracing::info!(
            "Starting crawl: {} entries queued, cursor at {}",
            self.queue.len(),
            self.queue.cursor()
        );

        loop {
            match self.step().await? {
                Step::Visited(_) => {}
                Step::Stopped => {
                    tracing::info!(
                        "Crawl stopped on request at queue position {} of {}",
                        self.queue.cursor(),
                        self.queue.len()
                    );
                    return Ok(RunOutcome::Stopped);
                }
                Step::Exhausted => {
                    tracing::info!(
                        "Queue exhausted after {} entries, {} articles downloaded",
                        self.queue.len(),
                        self.downloaded_articles()
                    );
                    return Ok(RunOutcome::Exhausted);
                }
            }
        }
    }

    /// Waits for the crawl delay, then visits the next eligible entry
    ///
    /// The stop flag is checked after the wait, so a stop requested while
    /// pacing never starts another fetch.
    pub async fn step(&mut self) -> Result<Step> {
        tokio::select! {
            _ = self.scheduler.wait_turn() => {}
            _ = self.stop.stopped() => {}
        }

        if self.stop.is_stop_requested() {
            return Ok(Step::Stopped);
        }

        let Some(entry) = self.queue.next_eligible() else {
            return Ok(Step::Exhausted);
        };

        tracing::info!(
            url = entry.url(),
            position = entry.position(),
            queue_len = self.queue.len(),
            "Visiting"
        );

        let Some((status, new_links)) = self.visit(&entry).await? else {
            tracing::warn!(url = entry.url(), "Visit abandoned, entry keeps its status");
            return Ok(Step::Stopped);
        };
        self.queue.update_status(&entry, status)?;

        let report = VisitReport {
            url: entry.url().to_string(),
            position: entry.position(),
            status,
            new_links,
            queue_len: self.queue.len(),
        };

        tracing::info!(
            status = %report.status,
            new_links = report.new_links,
            queue_len = report.queue_len,
            downloaded = self.downloaded_articles(),
            "Visited {}",
            report.url
        );

        Ok(Step::Visited(report))
    }

    /// Fetches and processes one entry, returning its new status and the
    /// number of newly queued links
    ///
    /// Returns None when an abort cuts the fetch short.
    async fn visit(&mut self, entry: &EntryHandle) -> Result<Option<(UrlStatus, usize)>> {
        let (adapter, url) = match self.registry.resolve(entry.url()) {
            Resolution::Adapter { adapter, url } => (adapter, url),
            Resolution::Unsupported => {
                tracing::debug!(url = entry.url(), "No adapter for URL");
                return Ok(Some((UrlStatus::Unsupported, 0)));
            }
        };

        let fetched = tokio::select! {
            fetched = adapter.fetch_and_parse(&url) => fetched,
            _ = self.stop.aborted() => return Ok(None),
        };

        let page = match fetched {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(source_name = adapter.name(), "Fetch failed: {}", e);
                return Ok(Some((UrlStatus::Failed, 0)));
            }
        };

        let status = match adapter.extract_article(&page) {
            Some(article) => {
                self.store.append(&article)?;
                self.saved_articles += 1;
                tracing::debug!(title = %article.title, "Stored article");
                UrlStatus::Downloaded
            }
            None => UrlStatus::IsIndex,
        };

        let links = adapter.extract_links(&page);
        let new_links = self.queue.enqueue_all(&links);
        tracing::debug!("Found {} links, {} new", links.len(), new_links);

        Ok(Some((status, new_links)))
    }

    /// Stops the run loop and persists the queue
    ///
    /// Safe to call more than once. The queue file is replaced atomically, so
    /// a failed write leaves the previous file intact.
    pub fn finalize(&mut self) -> Result<()> {
        self.stop();

        if let Some(path) = &self.queue_path {
            self.queue.persist(path)?;
        }

        let counts = self.queue.status_counts();
        for (status, count) in &counts {
            tracing::debug!("{:>6} {}", count, status);
        }
        tracing::info!(
            "Finalized: {} queue entries, {} articles downloaded ({} this run)",
            self.queue.len(),
            self.downloaded_articles(),
            self.saved_articles
        );
        Ok(())
    }

    /// The crawl queue
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// The article store
    pub fn store(&self) -> &dyn ArticleStore {
        self.store.as_ref()
    }

    /// Articles stored this run plus downloaded entries passed over on resume
    pub fn downloaded_articles(&self) -> usize {
        self.saved_articles + self.queue.downloaded_passed()
    }
}
