use crate::model::{ConfigError, RemoteLookupError, SearchParams};
use crate::source::traits::ProductSource;

use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Product search over plain HTTP GET.
///
/// Idle connections are not kept, so every lookup opens and closes its own
/// connection.
pub struct HttpProductSource {
    client: Client,
}

impl HttpProductSource {
    pub fn new() -> Result<Self, ConfigError> {
        let client = Client::builder()
            .user_agent(concat!("price-matcher/", env!("CARGO_PKG_VERSION")))
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl ProductSource for HttpProductSource {
    async fn fetch(
        &self,
        url: &str,
        params: &SearchParams,
        timeout: Duration,
    ) -> Result<Value, RemoteLookupError> {
        debug!("GET {} q={:?} limit={}", url, params.q, params.limit);

        let response = self
            .client
            .get(url)
            .query(params)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| RemoteLookupError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteLookupError(format!("HTTP status {}", status)));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| RemoteLookupError(format!("Failed to decode JSON payload: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves exactly one canned HTTP response and returns the request line.
    async fn serve_once(response: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&buf[..n]).lines().next().unwrap_or_default().to_string()
        });
        (format!("http://{}/products/search", addr), handle)
    }

    fn params(q: &str) -> SearchParams {
        SearchParams {
            q: q.to_string(),
            limit: "5".to_string(),
        }
    }

    #[tokio::test]
    async fn decodes_json_and_sends_query_string() {
        let (url, handle) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 16\r\nConnection: close\r\n\r\n{\"products\": []}",
        )
        .await;

        let source = HttpProductSource::new().unwrap();
        let payload = source
            .fetch(&url, &params("Nike Pegasus 40"), Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(payload, serde_json::json!({ "products": [] }));
        let request_line = handle.await.unwrap();
        assert!(request_line.starts_with("GET /products/search?q=Nike+Pegasus+40&limit=5"));
    }

    #[tokio::test]
    async fn non_success_status_is_a_lookup_error() {
        let (url, _handle) = serve_once(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;

        let source = HttpProductSource::new().unwrap();
        let err = source
            .fetch(&url, &params("x"), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn malformed_json_is_a_lookup_error() {
        let (url, _handle) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 8\r\nConnection: close\r\n\r\nnot json",
        )
        .await;

        let source = HttpProductSource::new().unwrap();
        let err = source
            .fetch(&url, &params("x"), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("decode"));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_lookup_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = HttpProductSource::new().unwrap();
        let result = source
            .fetch(&format!("http://{}/", addr), &params("x"), Duration::from_secs(2))
            .await;
        assert!(result.is_err());
    }
}
