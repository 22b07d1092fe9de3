pub mod config;
pub mod lambda;
pub mod matcher;
pub mod model;
pub mod normalizer;
pub mod parser;
pub mod portal;
pub mod queries;
pub mod report;
pub mod source;

pub use config::{AppConfig, MatcherConfig};
pub use matcher::{HttpMatcherFactory, MatcherFactory, PriceMatcher};
pub use model::{MatchResult, Product, Query, RemoteLookupError};
pub use source::{HttpProductSource, ProductSource};

use tracing_subscriber::EnvFilter;

/// Logs to stderr, filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
