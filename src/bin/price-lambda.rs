use anyhow::Context;
use clap::Parser;
use price_matcher::HttpMatcherFactory;
use price_matcher::lambda::handle_event;
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;
use tracing::error;

/// Run one serverless price lookup event and print the response
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Event JSON file; read from stdin when omitted
    #[arg(long)]
    event: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    price_matcher::init_tracing();

    let args = Args::parse();
    let raw = match &args.event {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading event from {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("reading event from stdin")?;
            buf
        }
    };
    let event: Value = serde_json::from_str(&raw).context("event is not valid JSON")?;

    match handle_event(&event, &HttpMatcherFactory).await {
        Ok(response) => {
            println!("{}", serde_json::to_string(&response)?);
            Ok(())
        }
        Err(e) => {
            error!("Rejected event: {}", e);
            Err(e.into())
        }
    }
}
