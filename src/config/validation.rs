use crate::config::types::{Config, OutputConfig, SourceConfig, UserAgentConfig};
use crate::ConfigError;
use scraper::Selector;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_sources(&config.sources)?;
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.queue_path.is_empty() {
        return Err(ConfigError::Validation(
            "queue_path cannot be empty".to_string(),
        ));
    }

    if config.articles_path.is_empty() {
        return Err(ConfigError::Validation(
            "articles_path cannot be empty".to_string(),
        ));
    }

    if config.queue_path == config.articles_path {
        return Err(ConfigError::Validation(
            "queue_path and articles_path must differ".to_string(),
        ));
    }

    Ok(())
}

/// Validates news source entries
fn validate_sources(sources: &[SourceConfig]) -> Result<(), ConfigError> {
    if sources.is_empty() {
        return Err(ConfigError::Validation(
            "At least one [[source]] must be configured".to_string(),
        ));
    }

    let mut names = HashSet::new();
    for source in sources {
        if source.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Source name cannot be empty".to_string(),
            ));
        }

        if !names.insert(source.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Duplicate source name '{}'",
                source.name
            )));
        }

        validate_source_url(source)?;

        for subpath in &source.exclude_subpaths {
            if !subpath.starts_with('/') {
                return Err(ConfigError::Validation(format!(
                    "Excluded sub-path '{}' of source '{}' must start with '/'",
                    subpath, source.name
                )));
            }
        }

        validate_selector(&source.title_selector)?;
        validate_selector(&source.content_selector)?;
    }

    Ok(())
}

/// Validates that a source URL is an absolute http(s) URL with a host
fn validate_source_url(source: &SourceConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&source.url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid URL '{}' for source '{}': {}", source.url, source.name, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Source URL '{}' must use http or https",
            source.url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Source URL '{}' has no host",
            source.url
        )));
    }

    Ok(())
}

/// Validates that a CSS selector parses
fn validate_selector(selector: &str) -> Result<(), ConfigError> {
    if selector.trim().is_empty() {
        return Err(ConfigError::InvalidSelector(
            "Selector cannot be empty".to_string(),
        ));
    }

    Selector::parse(selector)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", selector, e)))
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    // Basic email format check: must contain @ and have text on both sides
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(name: &str, url: &str) -> SourceConfig {
        SourceConfig {
            name: name.to_string(),
            url: url.to_string(),
            exclude_subpaths: vec!["/content/".to_string()],
            title_selector: ".article-title".to_string(),
            content_selector: ".article-content p".to_string(),
            skip_phrases: vec![],
            category_from_path: false,
        }
    }

    #[test]
    fn test_validate_sources() {
        assert!(validate_sources(&[source("B.T.", "https://www.bt.dk")]).is_ok());
        assert!(validate_sources(&[]).is_err());
        assert!(validate_sources(&[source("", "https://www.bt.dk")]).is_err());
        assert!(validate_sources(&[
            source("B.T.", "https://www.bt.dk"),
            source("B.T.", "https://other.dk"),
        ])
        .is_err());
    }

    #[test]
    fn test_validate_source_url() {
        assert!(validate_source_url(&source("a", "http://example.com")).is_ok());
        assert!(validate_source_url(&source("a", "example.com")).is_err());
        assert!(validate_source_url(&source("a", "ftp://example.com")).is_err());
        assert!(validate_source_url(&source("a", "mailto:a@example.com")).is_err());
    }

    #[test]
    fn test_excluded_subpath_must_be_rooted() {
        let mut bad = source("a", "https://example.com");
        bad.exclude_subpaths = vec!["content/".to_string()];
        assert!(matches!(
            validate_sources(&[bad]),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_selector() {
        assert!(validate_selector(".article-content p").is_ok());
        assert!(validate_selector("h1").is_ok());
        assert!(validate_selector("").is_err());
        assert!(validate_selector("[[[").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("admin@sub.example.com").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@domain").is_err());
    }

    #[test]
    fn test_output_paths_must_differ() {
        let output = OutputConfig {
            queue_path: "same".to_string(),
            articles_path: "same".to_string(),
            format: Default::default(),
        };
        assert!(validate_output_config(&output).is_err());
    }
}
