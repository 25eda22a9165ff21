//! Site adapters
//!
//! A site adapter knows how to recognize, fetch and pick apart the pages of
//! one news source. The crawler only ever talks to adapters through the
//! [`SiteAdapter`] trait, resolved per URL by the [`AdapterRegistry`].

mod fetcher;
mod newspaper;
mod parser;
mod registry;

pub use fetcher::{build_http_client, fetch_page};
pub use newspaper::NewspaperAdapter;
pub use parser::{collect_links, first_text, joined_text};
pub use registry::{AdapterRegistry, Resolution};

use crate::storage::ArticleRecord;
use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// A fetched page, ready for extraction
///
/// Holds the raw body rather than a parsed document so it can be moved
/// across await points; extraction parses it on demand.
#[derive(Debug, Clone)]
pub struct Page {
    url: Url,
    final_url: Url,
    body: String,
}

impl Page {
    /// Creates a page served directly at `url`
    pub fn new(url: Url, body: impl Into<String>) -> Self {
        Self {
            final_url: url.clone(),
            url,
            body: body.into(),
        }
    }

    /// Records that the request for this page was redirected to `final_url`
    pub fn with_final_url(mut self, final_url: Url) -> Self {
        self.final_url = final_url;
        self
    }

    /// URL that was requested, the one queued for crawling
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// URL the body was served from after redirects; relative links
    /// resolve against it
    pub fn final_url(&self) -> &Url {
        &self.final_url
    }

    /// Raw HTML body
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Reasons a page could not be fetched
///
/// These are per-URL outcomes; the crawler records them as `FAILED` and
/// moves on.
#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error("{url} does not belong to {source_name}")]
    ForeignUrl { url: String, source_name: String },

    #[error("Request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Capability contract for one news source
///
/// Implementations must be cheap to share: the registry hands out
/// `Arc<dyn SiteAdapter>` and the crawler calls them from its task.
#[async_trait]
pub trait SiteAdapter: Send + Sync {
    /// Human-readable source name, written into every article record
    fn name(&self) -> &str;

    /// Returns true if the URL belongs to this source
    fn can_handle(&self, url: &Url) -> bool;

    /// Seed URL for bootstrapping this source
    fn front_page_url(&self) -> &Url;

    /// Fetches the URL and returns the page for extraction
    async fn fetch_and_parse(&self, url: &Url) -> Result<Page, FetchFailure>;

    /// Extracts the article on the page, or None for index pages
    fn extract_article(&self, page: &Page) -> Option<ArticleRecord>;

    /// Extracts the followable links on the page, deduplicated, in document order
    fn extract_links(&self, page: &Page) -> Vec<String>;
}
