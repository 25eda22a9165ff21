use serde::Deserialize;

/// Main configuration structure for the crawler
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// News sources, in resolution order
    #[serde(rename = "source", default)]
    pub sources: Vec<SourceConfig>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Minimum wall-clock spacing between visits (milliseconds)
    #[serde(rename = "crawl-delay", default = "default_crawl_delay")]
    pub crawl_delay: u64,

    /// Whether the queue is loaded at start and persisted at shutdown
    #[serde(rename = "store-queue", default = "default_true")]
    pub store_queue: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            crawl_delay: default_crawl_delay(),
            store_queue: true,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Article store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON object per line
    #[default]
    Jsonl,
    /// SQLite database
    Sqlite,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the persisted queue file
    #[serde(rename = "queue-path", default = "default_queue_path")]
    pub queue_path: String,

    /// Path to the article store
    #[serde(rename = "articles-path", default = "default_articles_path")]
    pub articles_path: String,

    /// Article store backend
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            queue_path: default_queue_path(),
            articles_path: default_articles_path(),
            format: OutputFormat::default(),
        }
    }
}

/// One news source and its extraction rules
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Display name, written into every article record
    pub name: String,

    /// Front page URL; its origin identifies the source
    pub url: String,

    /// Leading sub-paths (e.g. "/rabatkode/") whose links are never followed
    #[serde(rename = "exclude-subpaths", default)]
    pub exclude_subpaths: Vec<String>,

    /// CSS selector for the article title
    #[serde(rename = "title-selector")]
    pub title_selector: String,

    /// CSS selector for the article body blocks
    #[serde(rename = "content-selector")]
    pub content_selector: String,

    /// Body blocks containing any of these phrases are dropped
    #[serde(rename = "skip-phrases", default)]
    pub skip_phrases: Vec<String>,

    /// Record the first path segment as the `category` metadata value
    #[serde(rename = "category-from-path", default)]
    pub category_from_path: bool,
}

fn default_crawl_delay() -> u64 {
    20
}

fn default_true() -> bool {
    true
}

fn default_queue_path() -> String {
    ".queue".to_string()
}

fn default_articles_path() -> String {
    "articles.jsonl".to_string()
}
