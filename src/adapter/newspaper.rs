//! Configurable newspaper adapter
//!
//! One `[[source]]` block describes a whole newspaper: its origin, the CSS
//! selectors that mark up an article, and the sections that should never be
//! followed. This covers sites whose articles are a title element plus a
//! run of body paragraphs.

use crate::adapter::parser::{collect_links, first_text, joined_text};
use crate::adapter::{fetch_page, FetchFailure, Page, SiteAdapter};
use crate::config::SourceConfig;
use crate::origin::{leading_segment, leading_subpath, parse_absolute, same_origin};
use crate::storage::ArticleRecord;
use crate::{ConfigError, ConfigResult};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::BTreeMap;
use url::Url;

/// Site adapter driven by a [`SourceConfig`]
pub struct NewspaperAdapter {
    name: String,
    front_page: Url,
    exclude_subpaths: Vec<String>,
    title_selector: Selector,
    content_selector: Selector,
    skip_phrases: Vec<String>,
    category_from_path: bool,
    client: Client,
}

impl NewspaperAdapter {
    /// Builds the adapter for one source, fetching through `client`
    pub fn new(source: &SourceConfig, client: Client) -> ConfigResult<Self> {
        let front_page = parse_absolute(&source.url).ok_or_else(|| {
            ConfigError::InvalidUrl(format!(
                "Source '{}' has no absolute http(s) URL: '{}'",
                source.name, source.url
            ))
        })?;

        Ok(Self {
            name: source.name.clone(),
            front_page,
            exclude_subpaths: source.exclude_subpaths.clone(),
            title_selector: parse_selector(&source.title_selector)?,
            content_selector: parse_selector(&source.content_selector)?,
            skip_phrases: source.skip_phrases.clone(),
            category_from_path: source.category_from_path,
            client,
        })
    }

    /// Returns true if links under `subpath` must not be followed
    fn is_excluded(&self, subpath: &str) -> bool {
        self.exclude_subpaths.iter().any(|excluded| excluded == subpath)
    }

    fn metadata_for(&self, url: &Url) -> Option<BTreeMap<String, String>> {
        if !self.category_from_path {
            return None;
        }
        leading_segment(url.path())
            .map(|category| BTreeMap::from([("category".to_string(), category.to_string())]))
    }
}

#[async_trait]
impl SiteAdapter for NewspaperAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn can_handle(&self, url: &Url) -> bool {
        same_origin(url, &self.front_page)
    }

    fn front_page_url(&self) -> &Url {
        &self.front_page
    }

    async fn fetch_and_parse(&self, url: &Url) -> Result<Page, FetchFailure> {
        if !self.can_handle(url) {
            return Err(FetchFailure::ForeignUrl {
                url: url.to_string(),
                source_name: self.name.clone(),
            });
        }
        fetch_page(&self.client, url).await
    }

    fn extract_article(&self, page: &Page) -> Option<ArticleRecord> {
        let document = Html::parse_document(page.body());
        let title = first_text(&document, &self.title_selector)?;
        let content = joined_text(&document, &self.content_selector, &self.skip_phrases)?;

        Some(ArticleRecord {
            source_name: self.name.clone(),
            url: page.url().to_string(),
            metadata: self.metadata_for(page.url()),
            title,
            content,
        })
    }

    fn extract_links(&self, page: &Page) -> Vec<String> {
        let document = Html::parse_document(page.body());

        collect_links(&document, page.final_url())
            .into_iter()
            .filter(|link| same_origin(link, &self.front_page))
            .filter(|link| match leading_subpath(link.path()) {
                Some(subpath) => !self.is_excluded(subpath),
                None => false,
            })
            .map(String::from)
            .collect()
    }
}

fn parse_selector(css: &str) -> ConfigResult<Selector> {
    Selector::parse(css)
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", css, e)))
}
