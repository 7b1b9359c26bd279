use anyhow::Result;
use serde_json::Value;

/// Carries a JSON-RPC request to the application server and returns the raw
/// response body. HTTP clients, TLS settings and retries live behind this seam.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, endpoint: &str, body: Value) -> Result<Value>;
}

#[async_trait::async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn post(&self, endpoint: &str, body: Value) -> Result<Value> {
        (**self).post(endpoint, body).await
    }
}
