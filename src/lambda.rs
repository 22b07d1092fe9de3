// Serverless event handler over the matcher
use crate::config::{DEFAULT_BASE_URL, DEFAULT_LIMIT, DEFAULT_MIN_SCORE, DEFAULT_TIMEOUT_SECS, MatcherConfig};
use crate::matcher::MatcherFactory;
use crate::model::{HandlerError, Query};
use crate::report::serialize_result;
use serde_json::{Map, Value, json};
use tracing::info;

/// Handles an event of the form
/// `{"queries": [{"brand": .., "title": ..}], "base_url"?, "limit"?, "timeout"?, "min_score"?}`
/// and returns `{"results": [..]}` with one entry per query.
pub async fn handle_event(event: &Value, factory: &dyn MatcherFactory) -> Result<Value, HandlerError> {
    let Some(fields) = event.as_object() else {
        return Err(invalid("Event payload must be a mapping containing a 'queries' list."));
    };

    let base_url = fields
        .get("base_url")
        .map(value_text)
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let limit = coerce_int(fields, "limit", DEFAULT_LIMIT as i64)?;
    let timeout = coerce_float(fields, "timeout", DEFAULT_TIMEOUT_SECS)?;
    let min_score = coerce_float(fields, "min_score", DEFAULT_MIN_SCORE)?;
    if min_score > 1.0 {
        return Err(invalid("min_score must be at most 1"));
    }

    let Some(items) = fields.get("queries").and_then(Value::as_array) else {
        return Err(invalid("Event payload must supply 'queries' as a list of objects."));
    };
    let queries = parse_event_queries(items)?;

    info!("Serverless lookup: {} queries against {}", queries.len(), base_url);
    let matcher = factory.create(MatcherConfig::new(base_url, limit as usize, timeout))?;
    let results = matcher.batch_search(&queries, min_score).await;

    Ok(json!({
        "results": results.iter().map(|r| serialize_result(r.as_ref())).collect::<Vec<_>>(),
    }))
}

pub fn parse_event_queries(items: &[Value]) -> Result<Vec<Query>, HandlerError> {
    let mut queries = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let Some(fields) = item.as_object() else {
            return Err(invalid(format!(
                "Query at index {index} must be an object with 'brand' and 'title' keys."
            )));
        };
        let brand = fields.get("brand").map(value_text).unwrap_or_default();
        let title = fields.get("title").map(value_text).unwrap_or_default();
        let (brand, title) = (brand.trim(), title.trim());
        if brand.is_empty() || title.is_empty() {
            return Err(invalid(format!(
                "Query at index {index} must include non-empty 'brand' and 'title' values."
            )));
        }
        queries.push(Query::new(brand, title));
    }
    if queries.is_empty() {
        return Err(invalid("At least one query with brand and title must be provided."));
    }
    Ok(queries)
}

fn invalid(message: impl Into<String>) -> HandlerError {
    HandlerError::InvalidEvent(message.into())
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn coerce_int(fields: &Map<String, Value>, field: &str, default: i64) -> Result<i64, HandlerError> {
    let value = match fields.get(field) {
        None => default,
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| invalid(format!("{field} must be an integer")))?,
        Some(v) => match as_number(v) {
            Some(n) if n.is_finite() => n.trunc() as i64,
            _ => return Err(invalid(format!("{field} must be an integer"))),
        },
    };
    if value <= 0 {
        return Err(invalid(format!("{field} must be a positive integer")));
    }
    Ok(value)
}

fn coerce_float(fields: &Map<String, Value>, field: &str, default: f64) -> Result<f64, HandlerError> {
    let value = match fields.get(field) {
        None => default,
        Some(v) => as_number(v).ok_or_else(|| invalid(format!("{field} must be a number")))?,
    };
    if value.is_nan() || value <= 0.0 {
        return Err(invalid(format!("{field} must be positive")));
    }
    Ok(value)
}
