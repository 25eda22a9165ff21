//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small news site and drive the full
//! crawl cycle end-to-end: bootstrap, crawl, persist, resume.

use newsroom_crawler::config::{
    Config, CrawlerConfig, OutputConfig, OutputFormat, SourceConfig, UserAgentConfig,
};
use newsroom_crawler::crawler::{Crawler, RunOutcome, Step};
use newsroom_crawler::queue::Queue;
use newsroom_crawler::state::UrlStatus;
use newsroom_crawler::storage::{open_article_store, ArticleStore};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FRONT_PAGE: &str = r#"
<html><body>
    <a href="/samfund/minister-resigns">Minister resigns</a>
    <a href="/sport/late-winner#comments">Late winner</a>
    <a href="/samfund/missing">Missing</a>
    <a href="/rabatkode/shop">Discount codes</a>
    <a href="/cookiedeklaration">Cookies</a>
    <a href="https://elsewhere.example/news/x">Elsewhere</a>
</body></html>
"#;

fn article(title: &str, paragraphs: &[&str]) -> String {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<p>{}</p>", p))
        .collect();
    format!(
        r#"<html><body><h1 class="article-title">{}</h1><div class="article-content">{}</div><a href="/">Front</a></body></html>"#,
        title, body
    )
}

/// Creates a test configuration with one source served by `base_url`
fn create_test_config(base_url: &str, dir: &Path, format: OutputFormat) -> Config {
    let articles = match format {
        OutputFormat::Jsonl => "articles.jsonl",
        OutputFormat::Sqlite => "articles.db",
    };

    Config {
        crawler: CrawlerConfig {
            crawl_delay: 0,
            store_queue: true,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            queue_path: dir.join(".queue").display().to_string(),
            articles_path: dir.join(articles).display().to_string(),
            format,
        },
        sources: vec![SourceConfig {
            name: "Test Times".to_string(),
            url: base_url.to_string(),
            exclude_subpaths: vec!["/rabatkode/".to_string(), "/content/".to_string()],
            title_selector: ".article-title".to_string(),
            content_selector: ".article-content p".to_string(),
            skip_phrases: vec!["Foto: ".to_string()],
            category_from_path: true,
        }],
    }
}

async fn mount_site(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FRONT_PAGE))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/samfund/minister-resigns"))
        .respond_with(ResponseTemplate::new(200).set_body_string(article(
            "Minister resigns",
            &["The minister resigned.", "Foto: Someone", "More follows."],
        )))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sport/late-winner"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(article("Late winner", &["A late goal."])),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/samfund/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_single_source() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base, dir.path(), OutputFormat::Jsonl);

    let mut crawler = Crawler::from_config(&config, false).unwrap();
    assert_eq!(crawler.bootstrap(), 1);

    let outcome = crawler.run().await.unwrap();
    assert_eq!(outcome, RunOutcome::Exhausted);
    crawler.finalize().unwrap();

    let queue = Queue::load(Path::new(&config.output.queue_path)).unwrap();
    let entries: Vec<(String, UrlStatus)> = queue
        .entries()
        .iter()
        .map(|entry| (entry.url.clone(), entry.status))
        .collect();
    assert_eq!(
        entries,
        vec![
            (format!("{}/", base), UrlStatus::IsIndex),
            (format!("{}/samfund/minister-resigns", base), UrlStatus::Downloaded),
            (format!("{}/sport/late-winner", base), UrlStatus::Downloaded),
            (format!("{}/samfund/missing", base), UrlStatus::Failed),
        ]
    );

    let store = open_article_store(&config.output).unwrap();
    let articles = store.load_all().unwrap();
    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].source_name, "Test Times");
    assert_eq!(articles[0].title, "Minister resigns");
    assert_eq!(articles[0].content, "The minister resigned. More follows.");
    assert_eq!(
        articles[0].metadata.as_ref().and_then(|m| m.get("category")),
        Some(&"samfund".to_string())
    );
    assert_eq!(articles[1].title, "Late winner");
}

#[tokio::test]
async fn test_interrupted_crawl_resumes() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base, dir.path(), OutputFormat::Jsonl);

    // First run: visit the front page and one article, then shut down
    {
        let mut crawler = Crawler::from_config(&config, false).unwrap();
        crawler.bootstrap();
        assert!(matches!(crawler.step().await.unwrap(), Step::Visited(_)));
        assert!(matches!(crawler.step().await.unwrap(), Step::Visited(_)));
        crawler.stop();
        assert_eq!(crawler.run().await.unwrap(), RunOutcome::Stopped);
        crawler.finalize().unwrap();
    }

    // Second run picks up where the first stopped
    let mut crawler = Crawler::from_config(&config, false).unwrap();
    assert_eq!(crawler.bootstrap(), 0);
    assert_eq!(crawler.queue().len(), 4);

    let outcome = crawler.run().await.unwrap();
    assert_eq!(outcome, RunOutcome::Exhausted);
    assert_eq!(crawler.downloaded_articles(), 2);
    crawler.finalize().unwrap();

    let store = open_article_store(&config.output).unwrap();
    let titles: Vec<String> = store
        .load_all()
        .unwrap()
        .into_iter()
        .map(|a| a.title)
        .collect();
    assert_eq!(titles, vec!["Minister resigns", "Late winner"]);
}

#[tokio::test]
async fn test_fresh_run_ignores_saved_queue() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path(), OutputFormat::Sqlite);

    {
        let mut crawler = Crawler::from_config(&config, false).unwrap();
        crawler.bootstrap();
        crawler.run().await.unwrap();
        crawler.finalize().unwrap();
    }

    let mut crawler = Crawler::from_config(&config, true).unwrap();
    assert!(crawler.queue().is_empty());
    assert_eq!(crawler.bootstrap(), 1);
    crawler.run().await.unwrap();

    // Articles accumulate across runs; only the queue starts over
    assert_eq!(crawler.store().len().unwrap(), 4);
}

#[tokio::test]
async fn test_seed_outside_sources_is_unsupported() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path(), OutputFormat::Jsonl);

    let mut crawler = Crawler::from_config(&config, false).unwrap();
    assert!(crawler.add_seed("https://elsewhere.example/news/x"));

    match crawler.step().await.unwrap() {
        Step::Visited(report) => {
            assert_eq!(report.status, UrlStatus::Unsupported);
            assert_eq!(report.queue_len, 1);
        }
        other => panic!("expected a visit, got {:?}", other),
    }
}
