// Result serialization for the CLI, serverless and portal outputs
use crate::model::{MatchResult, Query};
use serde::Serialize;
use serde_json::{Value, json};

/// CLI row: every field is `null` when nothing matched.
#[derive(Debug, Serialize, PartialEq)]
pub struct ResultRow {
    pub brand: Option<String>,
    pub title: Option<String>,
    pub price: Option<f64>,
    pub score: Option<f64>,
}

pub fn results_to_rows(results: &[Option<MatchResult>]) -> Vec<ResultRow> {
    results
        .iter()
        .map(|result| match result {
            Some(m) => ResultRow {
                brand: Some(m.brand.clone()),
                title: Some(m.title.clone()),
                price: Some(m.price),
                score: Some(round3(m.score)),
            },
            None => ResultRow {
                brand: None,
                title: None,
                price: None,
                score: None,
            },
        })
        .collect()
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Serverless shape: the match object with its unrounded score, or `null`.
pub fn serialize_result(result: Option<&MatchResult>) -> Value {
    match result {
        Some(m) => json!({
            "brand": m.brand,
            "title": m.title,
            "price": m.price,
            "score": m.score,
        }),
        None => Value::Null,
    }
}

/// One rendered row of the portal results table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub brand: String,
    pub title: String,
    pub price: String,
}

/// Builds the portal table rows and the downloadable CSV. Unmatched
/// queries keep their own brand/title and get no price.
pub fn build_results_output(
    queries: &[Query],
    results: &[Option<MatchResult>],
) -> Result<(Vec<TableRow>, String), csv::Error> {
    let mut rows = Vec::with_capacity(queries.len());
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());
    writer.write_record(["brand", "title", "price"])?;

    for (query, result) in queries.iter().zip(results) {
        let (brand, title, price_text, csv_price) = match result {
            Some(m) => (
                m.brand.clone(),
                m.title.clone(),
                format_usd(m.price),
                format!("{:.2}", m.price),
            ),
            None => (
                query.brand.clone(),
                query.title.clone(),
                "Not found".to_string(),
                String::new(),
            ),
        };
        writer.write_record([brand.as_str(), title.as_str(), csv_price.as_str()])?;
        rows.push(TableRow {
            brand,
            title,
            price: price_text,
        });
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok((rows, String::from_utf8_lossy(&bytes).into_owned()))
}

/// `$1,234.56` style price with thousands separators.
pub fn format_usd(price: f64) -> String {
    let fixed = format!("{:.2}", price.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if price < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}
