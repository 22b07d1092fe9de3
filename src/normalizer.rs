use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Canonical form used for all brand/title comparisons.
///
/// NFKD splits accented letters into base + combining mark, the marks (and
/// anything else outside ASCII) are dropped, then every run of characters
/// outside `[a-z0-9]` becomes a single space.
pub fn normalize_text(value: &str) -> String {
    let ascii: String = value.nfkd().filter(char::is_ascii).collect();
    let lowered = ascii.to_ascii_lowercase();
    NON_ALNUM.replace_all(&lowered, " ").trim().to_string()
}
