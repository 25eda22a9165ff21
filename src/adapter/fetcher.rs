//! HTTP fetcher
//!
//! Builds the shared HTTP client with the crawler's user agent and turns a
//! GET request into a [`Page`] or a [`FetchFailure`].

use crate::adapter::{FetchFailure, Page};
use crate::config::UserAgentConfig;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use newsroom_crawler::adapter::build_http_client;
/// use newsroom_crawler::config::UserAgentConfig;
///
/// let config = UserAgentConfig {
///     crawler_name: "NewsroomCrawler".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version (+ContactURL; ContactEmail)
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and returns its body as a page
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | `Ok(Page)` for the requested URL, noting where redirects led |
/// | Any other status | `FetchFailure::Status` |
/// | Timeout, connection or body error | `FetchFailure::Network` |
pub async fn fetch_page(client: &Client, url: &Url) -> Result<Page, FetchFailure> {
    let network = |source: reqwest::Error| FetchFailure::Network {
        url: url.to_string(),
        source,
    };

    let response = client.get(url.clone()).send().await.map_err(network)?;
    let status = response.status();

    if !status.is_success() {
        return Err(FetchFailure::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let final_url = response.url().clone();
    let body = response.text().await.map_err(network)?;
    tracing::trace!(url = %final_url, bytes = body.len(), "Fetched page");

    Ok(Page::new(url.clone(), body).with_final_url(final_url))
}
