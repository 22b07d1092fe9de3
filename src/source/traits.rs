use crate::model::{RemoteLookupError, SearchParams};
use serde_json::Value;
use std::time::Duration;

/// Capability to run one product search against a remote endpoint.
///
/// Implementations must turn every transport, status or decoding failure
/// into a [`RemoteLookupError`].
#[async_trait::async_trait]
pub trait ProductSource: Send + Sync {
    async fn fetch(
        &self,
        url: &str,
        params: &SearchParams,
        timeout: Duration,
    ) -> Result<Value, RemoteLookupError>;
}
