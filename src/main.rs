use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use product_crawler::config::{CliOverrides, ConfigError, CrawlConfig};
use product_crawler::crawler::fetcher::Fetcher;
use product_crawler::crawler::renderer::Renderer;
use product_crawler::crawler::crawl_seed;
use product_crawler::output::Output;

/// A focused crawler that, given e-commerce seed URLs, discovers and emits
/// the product pages reachable within each site.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// One or more seed URLs, each the entry point for its own crawl.
    #[arg(required = true)]
    seeds: Vec<String>,

    /// Maximum link-following depth from each seed (seed itself is depth 0).
    #[arg(long)]
    max_depth: Option<u32>,

    /// Number of concurrent fetcher workers per seed.
    #[arg(long)]
    concurrency: Option<usize>,

    /// Path to the output CSV (truncated once at startup).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Optional JSON file of `{feature_name: weight}` overrides.
    #[arg(long)]
    weights: Option<PathBuf>,

    /// Path to a headless-browser renderer script (Node/Puppeteer-style).
    /// When omitted, Stage B rendering is disabled and failed Stage-A
    /// fetches are simply treated as fetch failures.
    #[arg(long)]
    renderer_script: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match CrawlConfig::from_cli(CliOverrides {
        seeds: cli.seeds,
        max_depth: cli.max_depth,
        concurrency: cli.concurrency,
        output: cli.output,
        weights_path: cli.weights,
        renderer_script_path: cli.renderer_script,
    }) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "failed to load configuration");
            fail(&err);
        }
    };

    let output = match Output::new(&config.output) {
        Ok(output) => Arc::new(output),
        Err(err) => {
            tracing::error!(error = %err, "failed to open output file");
            std::process::exit(1);
        }
    };

    let fetcher = Fetcher::new(config.connect_timeout_secs);
    let weights = Arc::new(config.feature_weights.clone());

    for seed in &config.seeds {
        let renderer = config.renderer_script_path.as_ref().map(|script_path| {
            let semaphore = Arc::new(tokio::sync::Semaphore::new(config.concurrency.max(1)));
            Renderer::new(
                semaphore,
                config.renderer_timeout_secs,
                script_path.display().to_string(),
            )
        });

        tracing::info!(seed = %seed, max_depth = config.max_depth, "starting crawl");
        let stats = crawl_seed(
            seed,
            config.max_depth,
            config.concurrency,
            fetcher.clone(),
            renderer,
            output.clone(),
            weights.clone(),
        )
        .await;

        tracing::info!(
            seed = %stats.seed,
            pages_fetched = stats.pages_fetched,
            product_urls_found = stats.product_urls_found,
            "seed quiesced"
        );
    }
}

fn fail(err: &ConfigError) -> ! {
    eprintln!("error: {err}");
    std::process::exit(1);
}
