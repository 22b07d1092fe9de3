// Core structs: Query, Product, MatchResult and the error kinds
use serde::Serialize;
use thiserror::Error;

/// A `(brand, title)` lookup supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub brand: String,
    pub title: String,
}

impl Query {
    pub fn new(brand: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
            title: title.into(),
        }
    }

    /// Text sent to the remote search endpoint.
    pub fn search_text(&self) -> String {
        format!("{} {}", self.brand, self.title).trim().to_string()
    }
}

/// One valid product returned by the remote search API.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub brand: String,
    pub title: String,
    pub price: f64,
}

/// Best candidate for a query, carrying the product's original text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub brand: String,
    pub title: String,
    pub price: f64,
    pub score: f64,
}

/// Query parameters sent with every product search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchParams {
    pub q: String,
    pub limit: String,
}

/// Any failure of the remote lookup: transport, status or payload decoding.
#[derive(Debug, Error)]
#[error("remote lookup failed: {0}")]
pub struct RemoteLookupError(pub String);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("limit must be a positive integer")]
    InvalidLimit,
    #[error("timeout must be positive")]
    InvalidTimeout,
    #[error("min_score must be between 0 and 1, got {0}")]
    InvalidMinScore(f64),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum QueryFileError {
    #[error("failed to read query file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse query CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("query file has no header row")]
    MissingHeader,
    #[error("Query file is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Rejected serverless event payloads.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("{0}")]
    InvalidEvent(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
