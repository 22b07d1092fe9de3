use crate::config::{MatcherConfig, validate_min_score};
use crate::model::{Query, QueryFileError};
use crate::portal::PortalState;
use crate::portal::error::{PortalError, PortalResult};
use crate::portal::form::FormValues;
use crate::portal::template::{PageView, render_page};
use crate::queries::{decode_csv_bytes, parse_queries};
use crate::report::build_results_output;
use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::response::Html;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, warn};

/// Characters left unescaped in the CSV data URL.
const DATA_URL_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

const MISSING_FILE: &str = "Please choose a CSV file containing brand and title columns.";

pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

pub async fn form_page(State(state): State<Arc<PortalState>>) -> Html<String> {
    let values = FormValues::from_defaults(&state.defaults);
    Html(render_page(&values, &PageView::default()))
}

pub async fn upload(
    State(state): State<Arc<PortalState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Html<String> {
    let mut values = FormValues::from_defaults(&state.defaults);
    let error_page = |values: &FormValues, message: &str| {
        Html(render_page(values, &PageView { error: Some(message), ..Default::default() }))
    };

    let mut multipart = match multipart {
        Ok(m) => m,
        Err(e) => {
            warn!("Upload without multipart body: {}", e);
            return error_page(&values, "Missing content type header on request.");
        }
    };

    let mut upload: Option<Vec<u8>> = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read multipart field: {}", e);
                return error_page(&values, "Failed to read the uploaded CSV file.");
            }
        };
        let name = field.name().unwrap_or_default().to_string();
        if name == "queries" {
            let has_filename = field.file_name().is_some_and(|f| !f.is_empty());
            match field.bytes().await {
                Ok(bytes) if has_filename || !bytes.is_empty() => upload = Some(bytes.to_vec()),
                Ok(_) => {}
                Err(e) => {
                    warn!("Failed to read uploaded file: {}", e);
                    return error_page(&values, "Failed to read the uploaded CSV file.");
                }
            }
        } else if let Ok(text) = field.text().await {
            values.set(&name, &text);
        }
    }

    let (config, min_score) = match values.parse() {
        Ok(parsed) => parsed,
        Err(message) => return error_page(&values, &message),
    };
    let Some(bytes) = upload else {
        return error_page(&values, MISSING_FILE);
    };

    let queries = match parse_queries(&decode_csv_bytes(&bytes)) {
        Ok(queries) => queries,
        Err(QueryFileError::MissingHeader) => {
            return error_page(&values, "Uploaded CSV is missing a header row with brand,title columns.");
        }
        Err(QueryFileError::MissingColumns(_)) => {
            return error_page(&values, "Uploaded CSV is missing required columns: brand,title.");
        }
        Err(e) => {
            warn!("Unreadable upload: {}", e);
            return error_page(&values, "Unable to parse the uploaded CSV. Please use UTF-8 encoding.");
        }
    };
    if queries.is_empty() {
        return error_page(&values, "The uploaded CSV did not contain any brand/title rows.");
    }

    let matcher = match state.factory.create(config) {
        Ok(matcher) => matcher,
        Err(e) => return error_page(&values, &format!("Failed to initialise price model: {}", e)),
    };

    info!("Portal upload: {} queries", queries.len());
    let results = matcher.batch_search(&queries, min_score).await;
    let (rows, csv_payload) = match build_results_output(&queries, &results) {
        Ok(output) => output,
        Err(e) => {
            warn!("Failed to build results CSV: {}", e);
            return error_page(&values, "Failed to build the results CSV.");
        }
    };
    let download_href = format!(
        "data:text/csv;charset=utf-8,{}",
        utf8_percent_encode(&csv_payload, DATA_URL_SAFE)
    );

    Html(render_page(
        &values,
        &PageView {
            success: Some("Price lookup complete. Download the results below."),
            rows: Some(&rows),
            csv_payload: Some(&csv_payload),
            download_href: Some(&download_href),
            ..Default::default()
        },
    ))
}

/// Body of `POST /search`: a single pair or a list of pairs.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub base_url: Option<String>,
    pub limit: Option<usize>,
    pub timeout: Option<f64>,
    pub min_score: Option<f64>,
    pub brand: Option<String>,
    pub title: Option<String>,
    pub pairs: Option<Vec<(String, String)>>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SearchItem {
    pub brand: String,
    pub title: String,
    pub price: Option<f64>,
    pub found: bool,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    pub results: Vec<SearchItem>,
}

pub async fn search_api(
    State(state): State<Arc<PortalState>>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> PortalResult<Json<SearchResponse>> {
    let Json(request) = payload.map_err(|e| PortalError::BadRequest(e.body_text()))?;

    let queries: Vec<Query> = match request.pairs {
        Some(pairs) => pairs
            .into_iter()
            .map(|(brand, title)| Query::new(brand.trim(), title.trim()))
            .filter(|q| !q.brand.is_empty() && !q.title.is_empty())
            .collect(),
        None => {
            let brand = request.brand.as_deref().unwrap_or_default().trim();
            let title = request.title.as_deref().unwrap_or_default().trim();
            if brand.is_empty() || title.is_empty() {
                return Err(PortalError::BadRequest(
                    "Provide 'brand' and 'title' or 'pairs'.".into(),
                ));
            }
            vec![Query::new(brand, title)]
        }
    };

    let config = MatcherConfig::new(
        request.base_url.unwrap_or_else(|| state.defaults.base_url.clone()),
        request.limit.unwrap_or(state.defaults.limit),
        request.timeout.unwrap_or(state.defaults.timeout_secs),
    );
    let min_score = validate_min_score(request.min_score.unwrap_or(state.defaults.min_score))
        .map_err(|e| PortalError::BadRequest(e.to_string()))?;
    let matcher = state
        .factory
        .create(config)
        .map_err(|e| PortalError::BadRequest(e.to_string()))?;

    let results = matcher.batch_search(&queries, min_score).await;
    let items = queries
        .into_iter()
        .zip(results)
        .map(|(query, result)| match result {
            Some(m) => SearchItem { brand: m.brand, title: m.title, price: Some(m.price), found: true },
            None => SearchItem { brand: query.brand, title: query.title, price: None, found: false },
        })
        .collect();

    Ok(Json(SearchResponse { results: items }))
}
