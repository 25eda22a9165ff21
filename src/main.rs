//! Newsroom Crawler main entry point
//!
//! This is the command-line interface for the news article crawler.

use anyhow::Context;
use clap::Parser;
use newsroom_crawler::config::{load_config_with_hash, Config};
use newsroom_crawler::crawler::{spawn_signal_listener, Crawler, RunOutcome};
use newsroom_crawler::queue::Queue;
use newsroom_crawler::state::UrlStatus;
use newsroom_crawler::storage::{open_article_store, ArticleStore};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Newsroom Crawler: a polite, resumable news article crawler
///
/// Walks the configured news sites one page at a time, stores every article
/// it finds and remembers its progress between runs.
#[derive(Parser, Debug)]
#[command(name = "newsroom-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A polite, resumable news article crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Start from an empty queue, ignoring the persisted one
    #[arg(long)]
    fresh: bool,

    /// Extra URL to queue before crawling (repeatable)
    #[arg(long = "seed", value_name = "URL")]
    seeds: Vec<String>,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with_all = ["stats", "dump_articles"])]
    dry_run: bool,

    /// Show queue and article statistics and exit
    #[arg(long, conflicts_with_all = ["dry_run", "dump_articles"])]
    stats: bool,

    /// Print every stored article as pretty JSON and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    dump_articles: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    if cli.dry_run {
        handle_dry_run(&config, &cli.seeds);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.dump_articles {
        handle_dump_articles(&config)?;
    } else {
        handle_crawl(&config, cli.fresh, &cli.seeds).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("newsroom_crawler=info,warn"),
            1 => EnvFilter::new("newsroom_crawler=debug,info"),
            2 => EnvFilter::new("newsroom_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the settings and sources
fn handle_dry_run(config: &Config, seeds: &[String]) {
    println!("=== Newsroom Crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Crawl delay: {}ms", config.crawler.crawl_delay);
    println!("  Store queue: {}", config.crawler.store_queue);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nOutput:");
    println!("  Queue: {}", config.output.queue_path);
    println!(
        "  Articles: {} ({:?})",
        config.output.articles_path, config.output.format
    );

    println!("\nSources ({}):", config.sources.len());
    for source in &config.sources {
        println!("  - {} <{}>", source.name, source.url);
        println!("    title: {}", source.title_selector);
        println!("    content: {}", source.content_selector);
        for subpath in &source.exclude_subpaths {
            println!("    * excluded {}", subpath);
        }
    }

    if !seeds.is_empty() {
        println!("\nExtra seeds ({}):", seeds.len());
        for seed in seeds {
            println!("  - {}", seed);
        }
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows queue status counts and article count
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let queue_path = Path::new(&config.output.queue_path);
    let queue = Queue::load(queue_path)
        .with_context(|| format!("Failed to load queue {}", queue_path.display()))?;
    let counts = queue.status_counts();

    println!("Queue: {} ({} entries)\n", queue_path.display(), queue.len());
    for status in UrlStatus::all_states() {
        println!(
            "  {:>8}  {}",
            counts.get(&status).copied().unwrap_or(0),
            status
        );
    }

    let store = open_article_store(&config.output)
        .with_context(|| format!("Failed to open articles {}", config.output.articles_path))?;
    println!(
        "\nArticles: {} ({} stored)",
        config.output.articles_path,
        store.len()?
    );

    Ok(())
}

/// Handles the --dump-articles mode: pretty-prints every stored article
fn handle_dump_articles(config: &Config) -> anyhow::Result<()> {
    let store = open_article_store(&config.output)
        .with_context(|| format!("Failed to open articles {}", config.output.articles_path))?;

    for article in store.load_all()? {
        println!("{}", serde_json::to_string_pretty(&article)?);
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, fresh: bool, seeds: &[String]) -> anyhow::Result<()> {
    let mut crawler = Crawler::from_config(config, fresh).context("Failed to set up crawler")?;

    crawler.bootstrap();
    for seed in seeds {
        crawler.add_seed(seed);
    }

    let listener = spawn_signal_listener(crawler.stop_handle());
    let outcome = crawler.run().await;
    listener.abort();

    // Persist the queue even when the run ended in an error
    crawler.finalize().context("Failed to persist the queue")?;

    match outcome.context("Crawl aborted")? {
        RunOutcome::Exhausted => tracing::info!("Crawl finished: nothing left to visit"),
        RunOutcome::Stopped => tracing::info!("Crawl interrupted; rerun to resume"),
    }

    Ok(())
}
