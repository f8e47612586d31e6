// reqwest-backed endpoint client
use crate::application::endpoint_client::{EndpointClient, EndpointRequest};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpEndpointClient {
    client: reqwest::Client,
}

impl HttpEndpointClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl EndpointClient for HttpEndpointClient {
    async fn send(&self, request: EndpointRequest) -> Result<Value> {
        let method = Method::from_bytes(request.method.as_bytes())
            .with_context(|| format!("Invalid HTTP verb {}", request.method))?;

        let mut builder = self
            .client
            .request(method, &request.url)
            .header("Accept", "application/json");
        if let Some(token) = &request.bearer_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", request.url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Endpoint {} responded with status {}: {}", request.url, status, body);
        }

        let body = response
            .text()
            .await
            .context("Failed to read endpoint response")?;
        Ok(parse_body(body))
    }
}

fn parse_body(body: String) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&body).unwrap_or(Value::String(body))
}
