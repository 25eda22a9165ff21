//! Ordered registry of site adapters

use crate::adapter::{NewspaperAdapter, SiteAdapter};
use crate::config::Config;
use crate::origin::parse_absolute;
use reqwest::Client;
use std::sync::Arc;
use url::Url;

/// Outcome of resolving a queued URL to an adapter
pub enum Resolution {
    /// The first adapter that accepts the URL
    Adapter {
        adapter: Arc<dyn SiteAdapter>,
        url: Url,
    },
    /// No adapter accepts the URL, including URLs that are not absolute
    /// http(s) URLs at all
    Unsupported,
}

impl std::fmt::Debug for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolution::Adapter { adapter, url } => f
                .debug_struct("Adapter")
                .field("adapter", &adapter.name())
                .field("url", &url.as_str())
                .finish(),
            Resolution::Unsupported => f.write_str("Unsupported"),
        }
    }
}

/// Adapters in resolution order; the first match wins
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: Vec<Arc<dyn SiteAdapter>>,
}

impl AdapterRegistry {
    /// Creates a registry from adapters in resolution order
    pub fn new(adapters: Vec<Arc<dyn SiteAdapter>>) -> Self {
        Self { adapters }
    }

    /// Builds one [`NewspaperAdapter`] per configured source
    ///
    /// All adapters share `client`. Fails if a source's URL or selectors do
    /// not parse, which validation already rules out for loaded configs.
    pub fn from_config(config: &Config, client: Client) -> crate::ConfigResult<Self> {
        let adapters = config
            .sources
            .iter()
            .map(|source| {
                NewspaperAdapter::new(source, client.clone())
                    .map(|adapter| Arc::new(adapter) as Arc<dyn SiteAdapter>)
            })
            .collect::<crate::ConfigResult<Vec<_>>>()?;
        Ok(Self::new(adapters))
    }

    /// Finds the adapter responsible for `raw`
    pub fn resolve(&self, raw: &str) -> Resolution {
        let Some(url) = parse_absolute(raw) else {
            return Resolution::Unsupported;
        };

        match self.adapters.iter().find(|adapter| adapter.can_handle(&url)) {
            Some(adapter) => Resolution::Adapter {
                adapter: Arc::clone(adapter),
                url,
            },
            None => Resolution::Unsupported,
        }
    }

    /// Iterates adapters in resolution order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn SiteAdapter>> {
        self.adapters.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
