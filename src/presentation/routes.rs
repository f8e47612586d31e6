// Router - maps the HTTP API onto handlers
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::*;
use axum::{
    routing::{get, patch, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/state", get(get_state))
        .route("/state/events", get(state_events))
        .route("/commands", post(dispatch_command))
        .route("/dashboards", get(list_dashboards).post(create_dashboard))
        .route("/dashboards/:id", get(get_dashboard).delete(delete_dashboard))
        .route("/dashboards/:id/title", put(update_dashboard_title))
        .route("/dashboards/:id/containers", post(add_container))
        .route(
            "/dashboards/:id/containers/:container_id",
            patch(update_container).delete(delete_container),
        )
        .route(
            "/dashboards/:id/containers/:container_id/components",
            post(add_component),
        )
        .route(
            "/dashboards/:id/containers/:container_id/components/:component_id",
            patch(update_component).delete(delete_component),
        )
        .route(
            "/dashboards/:id/containers/:container_id/components/:component_id/refresh",
            post(refresh_component),
        )
        .route(
            "/auth/settings",
            get(get_auth_settings).patch(update_auth_settings),
        )
        .route("/auth/settings/export", get(export_auth_settings))
        .route("/auth/settings/import", post(import_auth_settings))
        .route("/auth/start", post(start_auth))
        .route("/auth/token", get(get_token))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::auth_service::{AuthService, BrowserLauncher};
    use crate::application::auth_session::AuthSession;
    use crate::application::dashboard_manager::DashboardManager;
    use crate::application::endpoint_client::{EndpointClient, EndpointRequest};
    use crate::application::endpoint_service::EndpointService;
    use crate::application::store::StateStore;
    use crate::infrastructure::config::AuthConfig;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct NoBrowser;

    impl BrowserLauncher for NoBrowser {
        fn open(&self, _url: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }

    struct EchoClient;

    #[async_trait]
    impl EndpointClient for EchoClient {
        async fn send(&self, request: EndpointRequest) -> anyhow::Result<Value> {
            Ok(json!({ "method": request.method, "url": request.url }))
        }
    }

    fn router() -> Router {
        let store = Arc::new(StateStore::default());
        let session = AuthSession::default();
        let config = AuthConfig {
            callback_port: 0,
            open_browser: false,
            ..AuthConfig::default()
        };
        let state = Arc::new(AppState {
            store: store.clone(),
            dashboards: DashboardManager::new(store.clone()),
            endpoint_service: EndpointService::new(store.clone(), Arc::new(EchoClient), session.clone()),
            auth_service: AuthService::new(store, session, Arc::new(NoBrowser), config),
        });
        build_router(state)
    }

    async fn call(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_dispatch_scenario() {
        let router = router();

        let (status, state) = call(
            &router,
            Method::POST,
            "/commands",
            Some(json!({
                "type": "ADD_DASHBOARD",
                "payload": {
                    "dashboardSettings": { "id": "dashboard-1", "title": "A", "layout": "grid" },
                    "containers": []
                }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state["dashboards"].as_array().unwrap().len(), 1);
        assert_eq!(state["dashboards"][0]["dashboardSettings"]["title"], "A");

        call(
            &router,
            Method::POST,
            "/commands",
            Some(json!({
                "type": "ADD_CONTAINER",
                "payload": {
                    "dashboardId": "dashboard-1",
                    "container": {
                        "containerSettings": { "id": "c1", "title": "C", "apiDefinition": {} },
                        "components": []
                    }
                }
            })),
        )
        .await;
        let (_, state) = call(
            &router,
            Method::POST,
            "/commands",
            Some(json!({
                "type": "REMOVE_CONTAINER",
                "payload": { "dashboardId": "dashboard-1", "containerId": "c1" }
            })),
        )
        .await;
        assert_eq!(state["dashboards"][0]["containers"], json!([]));
    }

    #[tokio::test]
    async fn test_unknown_command_is_accepted_and_ignored() {
        let router = router();
        let (_, before) = call(&router, Method::GET, "/state", None).await;

        let (status, after) = call(
            &router,
            Method::POST,
            "/commands",
            Some(json!({ "type": "SOMETHING_NEW", "payload": {} })),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn test_bad_command_payload() {
        let router = router();
        let (status, body) = call(
            &router,
            Method::POST,
            "/commands",
            Some(json!({ "type": "UPDATE_DASHBOARD_TITLE", "payload": {} })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("UPDATE_DASHBOARD_TITLE"));
    }

    #[tokio::test]
    async fn test_dashboard_container_component_flow() {
        let router = router();

        let (status, dashboard) = call(&router, Method::POST, "/dashboards", Some(json!({}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(dashboard["dashboardSettings"]["title"], "New Dashboard");
        let id = dashboard["dashboardSettings"]["id"].as_str().unwrap().to_string();

        let (status, renamed) = call(
            &router,
            Method::PUT,
            &format!("/dashboards/{}/title", id),
            Some(json!({ "title": "Ops" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(renamed["dashboardSettings"]["title"], "Ops");

        let (status, container) = call(
            &router,
            Method::POST,
            &format!("/dashboards/{}/containers", id),
            Some(json!({ "title": "Users" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let container_id = container["containerSettings"]["id"].as_str().unwrap().to_string();

        let (status, _) = call(
            &router,
            Method::PATCH,
            &format!("/dashboards/{}/containers/{}", id, container_id),
            Some(json!({ "apiDefinition": { "baseUrl": "https://api.example.com", "authRequired": false } })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, component) = call(
            &router,
            Method::POST,
            &format!("/dashboards/{}/containers/{}/components", id, container_id),
            Some(json!({ "endpointUrl": "/users", "type": "Table" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(component["order"], 1);
        let component_id = component["id"].as_str().unwrap().to_string();

        let (status, data) = call(
            &router,
            Method::POST,
            &format!(
                "/dashboards/{}/containers/{}/components/{}/refresh",
                id, container_id, component_id
            ),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(data, json!({ "method": "GET", "url": "https://api.example.com/users" }));

        let (_, dashboard) = call(&router, Method::GET, &format!("/dashboards/{}", id), None).await;
        assert_eq!(
            dashboard["containers"][0]["components"][0]["dynamicData"]["url"],
            "https://api.example.com/users"
        );

        let (status, _) = call(
            &router,
            Method::DELETE,
            &format!("/dashboards/{}/containers/{}/components/{}", id, container_id, component_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = call(&router, Method::DELETE, &format!("/dashboards/{}", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = call(&router, Method::GET, &format!("/dashboards/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_targets_are_not_found() {
        let router = router();

        let (status, _) = call(
            &router,
            Method::POST,
            "/dashboards/nope/containers",
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(
            &router,
            Method::POST,
            "/dashboards/nope/containers/c/components/x/refresh",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_auth_settings_import_export() {
        let router = router();

        let (status, settings) = call(
            &router,
            Method::PATCH,
            "/auth/settings",
            Some(json!({ "clientId": "X" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(settings["clientId"], "X");
        assert_eq!(settings["responseType"], "token");

        let (status, exported) = call(&router, Method::GET, "/auth/settings/export", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(exported["clientId"], "X");

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/auth/settings/import")
                    .body(Body::from("{ broken"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let (_, settings) = call(&router, Method::GET, "/auth/settings", None).await;
        assert_eq!(settings["clientId"], "X");
    }

    #[tokio::test]
    async fn test_start_auth_without_browser() {
        let router = router();

        let (status, request) = call(&router, Method::POST, "/auth/start", None).await;
        assert_eq!(status, StatusCode::OK);
        let authorize_url = request["authorizeUrl"].as_str().unwrap();
        assert!(authorize_url.starts_with("https://example.com/oauth2/authorize?response_type=token"));
        assert!(authorize_url.contains("client_id=your-client-id"));

        let (_, token) = call(&router, Method::GET, "/auth/token", None).await;
        assert_eq!(token, json!({ "token": null }));
    }

    #[tokio::test]
    async fn test_health_check() {
        let router = router();
        let (status, body) = call(&router, Method::GET, "/healthz", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!("ok"));
    }
}
