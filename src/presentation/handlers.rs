// HTTP request handlers
use crate::application::auth_service::AuthRequest;
use crate::application::command::Command;
use crate::domain::auth::{AuthSettings, AuthSettingsPatch};
use crate::domain::component::{ComponentDefinition, ComponentPatch};
use crate::domain::container::{ContainerData, ContainerPatch};
use crate::domain::dashboard::DashboardData;
use crate::domain::state::GlobalState;
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    Json,
};
use futures::stream::Stream;
use serde::Deserialize;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::sync::Arc;

#[derive(Deserialize, Default)]
pub struct TitleRequest {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Deserialize)]
pub struct RenameRequest {
    pub title: String,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current state snapshot
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<GlobalState> {
    Json(state.store.get_state().as_ref().clone())
}

/// Server-sent events, one `state` event per snapshot
pub async fn state_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.store.watch();

    let stream = async_stream::stream! {
        loop {
            let snapshot = rx.borrow_and_update().clone();
            match Event::default().event("state").json_data(snapshot.as_ref()) {
                Ok(event) => yield Ok(event),
                Err(e) => tracing::warn!("Failed to encode state event: {}", e),
            }
            if rx.changed().await.is_err() {
                break;
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Dispatch a `{type, payload}` command envelope
pub async fn dispatch_command(
    State(state): State<Arc<AppState>>,
    Json(envelope): Json<Value>,
) -> Result<(StatusCode, Json<GlobalState>), ApiError> {
    let status = match Command::decode(envelope)? {
        Some(command) => {
            state.store.dispatch(command);
            StatusCode::OK
        }
        None => {
            tracing::debug!("Ignoring unknown command type");
            StatusCode::ACCEPTED
        }
    };
    Ok((status, Json(state.store.get_state().as_ref().clone())))
}

pub async fn list_dashboards(State(state): State<Arc<AppState>>) -> Json<Vec<DashboardData>> {
    Json(state.dashboards.list())
}

pub async fn create_dashboard(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TitleRequest>,
) -> (StatusCode, Json<DashboardData>) {
    let dashboard = state.dashboards.new_dashboard(request.title);
    (StatusCode::CREATED, Json(dashboard))
}

pub async fn get_dashboard(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardData>, ApiError> {
    state
        .dashboards
        .instance(&id)
        .get_dashboard()
        .map(Json)
        .ok_or_else(|| dashboard_not_found(&id))
}

pub async fn delete_dashboard(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> StatusCode {
    state.dashboards.remove(&id);
    StatusCode::NO_CONTENT
}

pub async fn update_dashboard_title(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<RenameRequest>,
) -> Result<Json<DashboardData>, ApiError> {
    let instance = state.dashboards.instance(&id);
    instance.update_title(&request.title);
    instance
        .get_dashboard()
        .map(Json)
        .ok_or_else(|| dashboard_not_found(&id))
}

pub async fn add_container(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<TitleRequest>,
) -> Result<(StatusCode, Json<ContainerData>), ApiError> {
    let instance = state.dashboards.instance(&id);
    if instance.get_dashboard().is_none() {
        return Err(dashboard_not_found(&id));
    }
    let container = instance.new_container(request.title);
    Ok((StatusCode::CREATED, Json(container)))
}

pub async fn update_container(
    Path((id, container_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    Json(patch): Json<ContainerPatch>,
) -> Result<Json<ContainerData>, ApiError> {
    let instance = state.dashboards.instance(&id);
    instance.update_container(&container_id, patch);
    instance
        .container(&container_id)
        .get_container()
        .map(Json)
        .ok_or_else(|| container_not_found(&id, &container_id))
}

pub async fn delete_container(
    Path((id, container_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> StatusCode {
    state.dashboards.instance(&id).remove_container(&container_id);
    StatusCode::NO_CONTENT
}

pub async fn add_component(
    Path((id, container_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    Json(draft): Json<ComponentPatch>,
) -> Result<(StatusCode, Json<ComponentDefinition>), ApiError> {
    state
        .dashboards
        .instance(&id)
        .container(&container_id)
        .add_endpoint(draft)
        .map(|definition| (StatusCode::CREATED, Json(definition)))
        .ok_or_else(|| container_not_found(&id, &container_id))
}

pub async fn update_component(
    Path((id, container_id, component_id)): Path<(String, String, String)>,
    State(state): State<Arc<AppState>>,
    Json(patch): Json<ComponentPatch>,
) -> Result<Json<ComponentDefinition>, ApiError> {
    let manager = state.dashboards.instance(&id).container(&container_id);
    manager.update_endpoint(&component_id, patch);
    manager
        .list_components()
        .into_iter()
        .find(|c| c.id == component_id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("component {} not found", component_id)))
}

pub async fn delete_component(
    Path((id, container_id, component_id)): Path<(String, String, String)>,
    State(state): State<Arc<AppState>>,
) -> StatusCode {
    state
        .dashboards
        .instance(&id)
        .container(&container_id)
        .delete_endpoint(&component_id);
    StatusCode::NO_CONTENT
}

/// Call the component's endpoint and return (and cache) the response
pub async fn refresh_component(
    Path((id, container_id, component_id)): Path<(String, String, String)>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, ApiError> {
    let data = state
        .endpoint_service
        .refresh(&id, &container_id, &component_id)
        .await?;
    Ok(Json(data))
}

pub async fn get_auth_settings(State(state): State<Arc<AppState>>) -> Json<AuthSettings> {
    Json(state.auth_service.settings())
}

pub async fn update_auth_settings(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<AuthSettingsPatch>,
) -> Json<AuthSettings> {
    Json(state.auth_service.update_settings(patch))
}

pub async fn export_auth_settings(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let body = state
        .auth_service
        .export_settings()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"auth-config.json\""),
        ],
        body,
    ))
}

/// Import an auth config file; the raw body is parsed here so malformed
/// files get a readable error instead of an extractor rejection
pub async fn import_auth_settings(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<AuthSettings>, ApiError> {
    Ok(Json(state.auth_service.import_settings(&body)?))
}

pub async fn start_auth(State(state): State<Arc<AppState>>) -> Result<Json<AuthRequest>, ApiError> {
    Ok(Json(state.auth_service.start().await?))
}

pub async fn get_token(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "token": state.auth_service.session().token() }))
}

fn dashboard_not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("dashboard {} not found", id))
}

fn container_not_found(dashboard_id: &str, container_id: &str) -> ApiError {
    ApiError::NotFound(format!(
        "container {} not found in dashboard {}",
        container_id, dashboard_id
    ))
}
