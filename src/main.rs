use anyhow::{Context, bail};
use clap::Parser;
use price_matcher::config::{AppConfig, load_config, validate_min_score};
use price_matcher::queries::load_queries;
use price_matcher::report::results_to_rows;
use price_matcher::{MatcherFactory, HttpMatcherFactory};
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Batch search clothing prices by brand and title
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Path to a CSV file containing brand,title columns for the queries
    queries: PathBuf,

    /// Minimum score threshold required to return a price match. Lower
    /// returns more results but with lower confidence [default: 0.45]
    #[arg(long)]
    min_score: Option<f64>,

    /// Remote product search endpoint that will be queried for prices
    #[arg(long)]
    base_url: Option<String>,

    /// Maximum number of products to request from the search API per query [default: 10]
    #[arg(long)]
    limit: Option<usize>,

    /// Timeout (in seconds) for each HTTP request to the product search API [default: 10]
    #[arg(long)]
    timeout: Option<f64>,

    /// Optional path to write JSON results. If omitted results are printed to stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// JSON file with default settings; flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Args {
    fn settings(&self) -> anyhow::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => AppConfig::default(),
        };
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(limit) = self.limit {
            config.limit = limit;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(min_score) = self.min_score {
            config.min_score = min_score;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    price_matcher::init_tracing();

    let args = Args::parse();
    let settings = args.settings()?;
    let min_score = validate_min_score(settings.min_score)?;

    let queries = load_queries(&args.queries)
        .with_context(|| format!("loading queries from {}", args.queries.display()))?;
    if queries.is_empty() {
        bail!("No queries loaded from the provided file");
    }
    info!("Loaded {} queries from {}", queries.len(), args.queries.display());

    let matcher = HttpMatcherFactory.create(settings.matcher_config())?;
    let results = matcher.batch_search(&queries, min_score).await;
    let output_text = serde_json::to_string_pretty(&results_to_rows(&results))?;

    match &args.output {
        Some(path) => {
            fs::write(path, output_text)
                .with_context(|| format!("writing results to {}", path.display()))?;
            info!("Results written to {}", path.display());
        }
        None => println!("{}", output_text),
    }

    Ok(())
}
