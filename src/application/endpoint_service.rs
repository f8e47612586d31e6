// Endpoint service - calls a component's endpoint and caches the response
use crate::application::auth_session::AuthSession;
use crate::application::command::Command;
use crate::application::endpoint_client::{EndpointClient, EndpointRequest};
use crate::application::store::StateStore;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("container {0} has no base URL for relative endpoint {1}")]
    MissingBaseUrl(String, String),
    #[error("endpoint request failed: {0}")]
    Request(String),
}

#[derive(Clone)]
pub struct EndpointService {
    store: Arc<StateStore>,
    client: Arc<dyn EndpointClient>,
    session: AuthSession,
}

impl EndpointService {
    pub fn new(store: Arc<StateStore>, client: Arc<dyn EndpointClient>, session: AuthSession) -> Self {
        Self {
            store,
            client,
            session,
        }
    }

    /// Fetch the component's endpoint and store the response as its dynamic data
    pub async fn refresh(
        &self,
        dashboard_id: &str,
        container_id: &str,
        component_id: &str,
    ) -> Result<Value, EndpointError> {
        let state = self.store.get_state();
        let container = state
            .container(dashboard_id, container_id)
            .ok_or_else(|| EndpointError::NotFound(format!("container {}/{}", dashboard_id, container_id)))?;
        let component = container
            .component(component_id)
            .ok_or_else(|| EndpointError::NotFound(format!("component {}", component_id)))?;

        let definition = &component.component_definition;
        let api = &container.container_settings.api_definition;
        let url = resolve_url(api.base_url.as_deref().unwrap_or(""), &definition.endpoint_url)
            .ok_or_else(|| {
                EndpointError::MissingBaseUrl(container_id.to_string(), definition.endpoint_url.clone())
            })?;

        let bearer_token = if api.requires_auth() {
            let token = self.session.token();
            if token.is_none() {
                tracing::warn!("Container {} requires auth but no token has been captured", container_id);
            }
            token
        } else {
            None
        };

        tracing::debug!("Refreshing component {} via {} {}", component_id, definition.verb, url);
        let request = EndpointRequest {
            method: definition.verb.to_uppercase(),
            url,
            bearer_token,
        };
        let data = self
            .client
            .send(request)
            .await
            .map_err(|e| EndpointError::Request(format!("{:#}", e)))?;

        self.store.dispatch(Command::UpdateDynamicData {
            dashboard_id: dashboard_id.to_string(),
            container_id: container_id.to_string(),
            component_id: component_id.to_string(),
            data: data.clone(),
        });

        Ok(data)
    }
}

/// Join a container base URL with an endpoint path. Absolute endpoint URLs
/// are used as they are.
pub fn resolve_url(base_url: &str, endpoint_url: &str) -> Option<String> {
    if endpoint_url.starts_with("http://") || endpoint_url.starts_with("https://") {
        return Some(endpoint_url.to_string());
    }
    if base_url.is_empty() {
        return None;
    }
    Some(format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint_url.trim_start_matches('/')
    ))
}
