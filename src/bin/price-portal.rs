use anyhow::Context;
use clap::Parser;
use price_matcher::config::{AppConfig, load_config, validate_min_score};
use price_matcher::portal::{self, PortalState};
use price_matcher::HttpMatcherFactory;
use std::path::PathBuf;
use std::sync::Arc;

/// Run the clothing price lookup portal
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Host interface to bind the portal server to [default: 127.0.0.1]
    #[arg(long)]
    host: Option<String>,

    /// Port to bind the portal server to [default: 8000]
    #[arg(long)]
    port: Option<u16>,

    /// Remote product search endpoint that will be queried for prices
    #[arg(long)]
    base_url: Option<String>,

    /// Maximum number of products to request from the search API per query
    #[arg(long)]
    limit: Option<usize>,

    /// Timeout (in seconds) for each HTTP request to the product search API
    #[arg(long)]
    timeout: Option<f64>,

    /// Minimum score threshold required to return a price match
    #[arg(long)]
    min_score: Option<f64>,

    /// JSON file with default settings; flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    price_matcher::init_tracing();

    let args = Args::parse();
    let mut defaults = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(host) = args.host {
        defaults.host = host;
    }
    if let Some(port) = args.port {
        defaults.port = port;
    }
    if let Some(base_url) = args.base_url {
        defaults.base_url = base_url;
    }
    if let Some(limit) = args.limit {
        defaults.limit = limit;
    }
    if let Some(timeout) = args.timeout {
        defaults.timeout_secs = timeout;
    }
    if let Some(min_score) = args.min_score {
        defaults.min_score = min_score;
    }
    defaults.matcher_config().validate()?;
    validate_min_score(defaults.min_score)?;

    let state = Arc::new(PortalState::new(defaults, Arc::new(HttpMatcherFactory)));
    portal::run(state).await
}
