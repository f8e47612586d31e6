// Application state for HTTP handlers
use crate::application::auth_service::AuthService;
use crate::application::dashboard_manager::DashboardManager;
use crate::application::endpoint_service::EndpointService;
use crate::application::store::StateStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<StateStore>,
    pub dashboards: DashboardManager,
    pub endpoint_service: EndpointService,
    pub auth_service: AuthService,
}
