//! Portal routes driven through the router with a stubbed product source.

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use price_matcher::config::{AppConfig, MatcherConfig};
use price_matcher::model::{ConfigError, RemoteLookupError, SearchParams};
use price_matcher::portal::handlers::SearchResponse;
use price_matcher::portal::{PortalState, build_router};
use price_matcher::{MatcherFactory, PriceMatcher, ProductSource};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

const BOUNDARY: &str = "----pricingboundary";

/// Knows one product; everything else comes back empty.
struct NikeOnly;

#[async_trait::async_trait]
impl ProductSource for NikeOnly {
    async fn fetch(&self, _url: &str, params: &SearchParams, _timeout: Duration) -> Result<Value, RemoteLookupError> {
        if params.q.starts_with("Nike") {
            Ok(json!({ "products": [{ "brand": "Nike", "title": "Pegasus 40", "price": 120.0 }] }))
        } else {
            Ok(json!({ "products": [] }))
        }
    }
}

#[derive(Default)]
struct RecordingFactory {
    created: Mutex<Vec<MatcherConfig>>,
}

impl MatcherFactory for RecordingFactory {
    fn create(&self, config: MatcherConfig) -> Result<PriceMatcher, ConfigError> {
        self.created.lock().unwrap().push(config.clone());
        PriceMatcher::new(config, Arc::new(NikeOnly))
    }
}

fn router(factory: Arc<RecordingFactory>) -> axum::Router {
    build_router(Arc::new(PortalState::new(AppConfig::default(), factory)))
}

fn multipart_body(fields: &[(&str, &str)], file: Option<&str>) -> Vec<u8> {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    if let Some(content) = file {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"queries\"; filename=\"queries.csv\"\r\nContent-Type: text/csv\r\n\r\n{content}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body.into_bytes()
}

fn upload_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn upload_renders_results_and_download() {
    let factory = Arc::new(RecordingFactory::default());
    let body = multipart_body(
        &[
            ("base_url", "https://example.com/api"),
            ("limit", "5"),
            ("timeout", "3.5"),
            ("min_score", "0.25"),
        ],
        Some("brand,title\nNike,Pegasus 40\nAdidas,Ultraboost\n"),
    );

    let response = router(factory.clone()).oneshot(upload_request("/", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Download CSV"));
    assert!(html.contains("Pegasus 40"));
    assert!(html.contains("$120.00"));
    assert!(html.contains("Not found"));
    assert!(html.contains("data:text/csv;charset=utf-8,brand%2Ctitle%2Cprice%0D%0A"));

    let created = factory.created.lock().unwrap();
    assert_eq!(created.as_slice(), &[MatcherConfig::new("https://example.com/api", 5, 3.5)]);
}

#[tokio::test]
async fn upload_route_accepts_the_same_form() {
    let factory = Arc::new(RecordingFactory::default());
    let body = multipart_body(&[], Some("brand,title\nNike,Pegasus 40\n"));

    let response = router(factory.clone()).oneshot(upload_request("/upload", body)).await.unwrap();

    let html = body_text(response).await;
    assert!(html.contains("Price lookup complete."));
    assert_eq!(factory.created.lock().unwrap()[0], MatcherConfig::default());
}

#[tokio::test]
async fn upload_errors_rerender_the_form() {
    let cases: Vec<(Vec<(&str, &str)>, Option<&str>, &str)> = vec![
        (vec![("limit", "5")], None, "Please choose a CSV file containing brand and title columns."),
        (vec![], Some("Nike,Pegasus 40\n"), "Uploaded CSV is missing required columns: brand,title."),
        (vec![], Some("brand,title\n\n"), "The uploaded CSV did not contain any brand/title rows."),
        (vec![("limit", "zero")], Some("brand,title\nNike,Pegasus\n"), "Limit must be an integer."),
        (vec![("min_score", "2")], Some("brand,title\nNike,Pegasus\n"), "Min Score must be at most 1."),
    ];

    for (fields, file, expected) in cases {
        let factory = Arc::new(RecordingFactory::default());
        let response = router(factory.clone())
            .oneshot(upload_request("/upload", multipart_body(&fields, file)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains(expected), "expected {expected:?}");
        assert!(!html.contains("<table"));
        assert!(factory.created.lock().unwrap().is_empty());
    }
}

#[tokio::test]
async fn form_and_health() {
    let factory = Arc::new(RecordingFactory::default());

    let response = router(factory.clone())
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Clothing Price Lookup Portal"));

    let response = router(factory)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let health: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(health, json!({ "ok": true }));
}

fn json_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/search")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn search_api_handles_pairs_and_single_queries() {
    let factory = Arc::new(RecordingFactory::default());

    let response = router(factory.clone())
        .oneshot(json_request(json!({ "pairs": [["Nike", "Pegasus 40"], ["Adidas", "Campus 00s"], ["", "skip"]] })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let parsed: SearchResponse = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(parsed.results.len(), 2);
    assert!(parsed.results[0].found);
    assert_eq!(parsed.results[0].price, Some(120.0));
    assert!(!parsed.results[1].found);
    assert_eq!(parsed.results[1].brand, "Adidas");
    assert_eq!(parsed.results[1].price, None);

    let response = router(factory)
        .oneshot(json_request(json!({ "brand": "Nike", "title": "Pegasus 40", "limit": 3 })))
        .await
        .unwrap();
    let parsed: SearchResponse = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(parsed.results.len(), 1);
    assert!(parsed.results[0].found);
}

#[tokio::test]
async fn search_api_rejects_bad_input() {
    let factory = Arc::new(RecordingFactory::default());
    for body in [
        json!({ "brand": "Nike" }),
        json!({ "brand": "Nike", "title": "Pegasus", "limit": 0 }),
        json!({ "brand": "Nike", "title": "Pegasus", "min_score": 3 }),
    ] {
        let response = router(factory.clone()).oneshot(json_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let detail: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert!(detail["detail"].is_string());
    }
}
