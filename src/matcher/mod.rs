// Matcher module: scoring primitives and the per-query selection policy.

pub mod sequence;
pub mod similarity;

use crate::config::MatcherConfig;
use crate::model::{ConfigError, MatchResult, Product, Query, RemoteLookupError, SearchParams};
use crate::normalizer::normalize_text;
use crate::parser::parse_products;
use crate::source::{HttpProductSource, ProductSource};
use similarity::{title_similarity, token_similarity};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Looks up the best priced product for brand/title queries.
///
/// Holds only immutable configuration and the injected source, so a single
/// instance can serve any number of queries concurrently.
pub struct PriceMatcher {
    config: MatcherConfig,
    timeout: Duration,
    source: Arc<dyn ProductSource>,
}

impl PriceMatcher {
    pub fn new(config: MatcherConfig, source: Arc<dyn ProductSource>) -> Result<Self, ConfigError> {
        let timeout = config.validate()?;
        Ok(Self { config, timeout, source })
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// One independent search per query, results in input order.
    pub async fn batch_search(&self, queries: &[Query], min_score: f64) -> Vec<Option<MatchResult>> {
        info!("Searching prices for {} queries (min score {:.2})", queries.len(), min_score);
        let mut results = Vec::with_capacity(queries.len());
        for query in queries {
            results.push(self.search(&query.brand, &query.title, min_score).await);
        }
        let found = results.iter().filter(|r| r.is_some()).count();
        info!("Matched {}/{} queries", found, queries.len());
        results
    }

    pub async fn search(&self, brand: &str, title: &str, min_score: f64) -> Option<MatchResult> {
        if brand.is_empty() || title.is_empty() {
            return None;
        }

        let query = Query::new(brand, title);
        let products = match self.fetch_products(&query).await {
            Ok(products) => products,
            Err(e) => {
                warn!("Lookup for '{}' failed: {}", query.search_text(), e);
                return None;
            }
        };

        let result = select_best(&products, brand, title, min_score);
        match &result {
            Some(m) => debug!("'{} {}' -> '{} {}' at {:.2} (score {:.3})", brand, title, m.brand, m.title, m.price, m.score),
            None => debug!("'{} {}' -> no match among {} products", brand, title, products.len()),
        }
        result
    }

    /// Runs the remote search and keeps only well-formed products.
    pub async fn fetch_products(&self, query: &Query) -> Result<Vec<Product>, RemoteLookupError> {
        let params = SearchParams {
            q: query.search_text(),
            limit: self.config.limit.to_string(),
        };
        let payload = self
            .source
            .fetch(&self.config.base_url, &params, self.timeout)
            .await?;
        Ok(parse_products(&payload))
    }
}

/// Scores every product against the query and keeps the first highest.
///
/// An exact normalized brand match is never dropped for its brand score;
/// it still has to clear the title and overall thresholds.
pub fn select_best(products: &[Product], brand: &str, title: &str, min_score: f64) -> Option<MatchResult> {
    let query_brand = normalize_text(brand);
    let query_title = normalize_text(title);

    let mut best: Option<(&Product, f64)> = None;
    for product in products {
        let product_brand = normalize_text(&product.brand);
        let exact_brand = product_brand == query_brand;
        let brand_score = if exact_brand {
            1.0
        } else {
            token_similarity(&product_brand, &query_brand)
        };
        if brand_score < min_score && !exact_brand {
            continue;
        }

        let title_score = title_similarity(&normalize_text(&product.title), &query_title);
        if title_score < min_score {
            continue;
        }

        let combined = 0.5 * brand_score + 0.5 * title_score;
        if best.is_none_or(|(_, score)| combined > score) {
            best = Some((product, combined));
        }
    }

    let (product, score) = best?;
    if score < min_score {
        return None;
    }
    Some(MatchResult {
        brand: product.brand.clone(),
        title: product.title.clone(),
        price: product.price,
        score,
    })
}

/// Builds matchers on demand; adapters take one so tests can swap the source.
pub trait MatcherFactory: Send + Sync {
    fn create(&self, config: MatcherConfig) -> Result<PriceMatcher, ConfigError>;
}

/// Factory backed by a fresh [`HttpProductSource`] per matcher.
pub struct HttpMatcherFactory;

impl MatcherFactory for HttpMatcherFactory {
    fn create(&self, config: MatcherConfig) -> Result<PriceMatcher, ConfigError> {
        config.validate()?;
        PriceMatcher::new(config, Arc::new(HttpProductSource::new()?))
    }
}
