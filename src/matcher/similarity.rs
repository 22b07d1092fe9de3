use crate::matcher::sequence::sequence_ratio;
use std::collections::HashSet;

const TOKEN_WEIGHT: f64 = 0.7;
const SEQUENCE_WEIGHT: f64 = 0.3;

/// Jaccard index of the whitespace-separated token sets.
/// An empty side means no similarity, even when both are empty.
pub fn token_similarity(candidate: &str, query: &str) -> f64 {
    let candidate_tokens: HashSet<&str> = candidate.split_whitespace().collect();
    let query_tokens: HashSet<&str> = query.split_whitespace().collect();
    if candidate_tokens.is_empty() || query_tokens.is_empty() {
        return 0.0;
    }
    let intersection = candidate_tokens.intersection(&query_tokens).count();
    let union = candidate_tokens.union(&query_tokens).count();
    intersection as f64 / union as f64
}

/// Bag-of-words overlap blended with whole-string sequence similarity.
/// Both inputs are expected to be normalized already.
pub fn title_similarity(candidate: &str, query: &str) -> f64 {
    let token_score = token_similarity(candidate, query);
    let sequence_score = sequence_ratio(candidate, query);
    TOKEN_WEIGHT * token_score + SEQUENCE_WEIGHT * sequence_score
}
