use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use newsroom_crawler::config::load_config;
///
/// let config = load_config(Path::new("crawler.toml")).unwrap();
/// println!("Crawl delay: {} ms", config.crawler.crawl_delay);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so two runs over the same queue can be told apart
/// when the source rules changed in between.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const USER_AGENT: &str = r#"
[user-agent]
crawler-name = "NewsroomCrawler"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"
"#;

    const BT_SOURCE: &str = r#"
[[source]]
name = "B.T."
url = "https://www.bt.dk"
exclude-subpaths = ["/rabatkode/", "/content/", "/cookiedeklaration"]
title-selector = ".article-title"
content-selector = ".article-content p"
skip-phrases = ["Foto: ", "Vis mere"]
category-from-path = true
"#;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = format!(
            r#"
[crawler]
crawl-delay = 250
store-queue = false

[output]
queue-path = "state/.queue"
articles-path = "state/articles.db"
format = "sqlite"
{}{}"#,
            USER_AGENT, BT_SOURCE
        );

        let file = create_temp_config(&config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.crawl_delay, 250);
        assert!(!config.crawler.store_queue);
        assert_eq!(config.output.format, OutputFormat::Sqlite);
        assert_eq!(config.output.queue_path, "state/.queue");
        assert_eq!(config.user_agent.crawler_name, "NewsroomCrawler");
        assert_eq!(config.sources.len(), 1);

        let source = &config.sources[0];
        assert_eq!(source.name, "B.T.");
        assert_eq!(source.exclude_subpaths.len(), 3);
        assert_eq!(source.skip_phrases, vec!["Foto: ", "Vis mere"]);
        assert!(source.category_from_path);
    }

    #[test]
    fn test_defaults_apply() {
        let config = parse_config(&format!("{}{}", USER_AGENT, BT_SOURCE)).unwrap();

        assert_eq!(config.crawler.crawl_delay, 20);
        assert!(config.crawler.store_queue);
        assert_eq!(config.output.queue_path, ".queue");
        assert_eq!(config.output.articles_path, "articles.jsonl");
        assert_eq!(config.output.format, OutputFormat::Jsonl);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/crawler.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_format_is_a_parse_error() {
        let content = format!("[output]\nformat = \"xml\"\n{}{}", USER_AGENT, BT_SOURCE);
        assert!(matches!(parse_config(&content), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_config_without_sources_is_rejected() {
        let result = parse_config(USER_AGENT);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_bad_selector_is_rejected() {
        let content = format!(
            "{}{}",
            USER_AGENT,
            BT_SOURCE.replace(".article-title", "[[[")
        );
        assert!(matches!(
            parse_config(&content),
            Err(ConfigError::InvalidSelector(_))
        ));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
