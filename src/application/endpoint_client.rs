// Endpoint client trait - outbound HTTP for component refreshes
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct EndpointRequest {
    pub method: String,
    pub url: String,
    pub bearer_token: Option<String>,
}

#[async_trait]
pub trait EndpointClient: Send + Sync {
    /// Send the request and return the response body as JSON; non-JSON
    /// bodies come back as a JSON string
    async fn send(&self, request: EndpointRequest) -> anyhow::Result<Value>;
}
