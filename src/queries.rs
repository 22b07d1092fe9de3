// Query CSV loading shared by the CLI and the portal upload
use crate::model::{Query, QueryFileError};
use std::fs;
use std::path::Path;

const REQUIRED_COLUMNS: [&str; 2] = ["brand", "title"];

/// Reads a CSV file with `brand` and `title` columns.
pub fn load_queries(path: impl AsRef<Path>) -> Result<Vec<Query>, QueryFileError> {
    let bytes = fs::read(path)?;
    parse_queries(&decode_csv_bytes(&bytes))
}

/// UTF-8 with an optional byte order mark; invalid sequences are replaced.
pub fn decode_csv_bytes(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_prefix('\u{feff}').unwrap_or(&text).to_string()
}

/// Parses query rows. Header names are matched case-insensitively after
/// trimming; rows whose brand or title is blank are skipped.
pub fn parse_queries(text: &str) -> Result<Vec<Query>, QueryFileError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(QueryFileError::MissingHeader);
    }

    let column = |name: &str| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name));
    let (brand_idx, title_idx) = match (column("brand"), column("title")) {
        (Some(b), Some(t)) => (b, t),
        (b, t) => {
            let mut missing: Vec<String> = REQUIRED_COLUMNS
                .iter()
                .zip([b, t])
                .filter(|(_, idx)| idx.is_none())
                .map(|(name, _)| name.to_string())
                .collect();
            missing.sort();
            return Err(QueryFileError::MissingColumns(missing));
        }
    };

    let mut queries = Vec::new();
    for record in reader.records() {
        let record = record?;
        let brand = record.get(brand_idx).unwrap_or_default().trim();
        let title = record.get(title_idx).unwrap_or_default().trim();
        if !brand.is_empty() && !title.is_empty() {
            queries.push(Query::new(brand, title));
        }
    }
    Ok(queries)
}
