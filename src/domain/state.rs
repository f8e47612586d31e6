// Global state - the single root of all persisted application data
use super::auth::AuthSettings;
use super::container::ContainerData;
use super::dashboard::DashboardData;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalState {
    pub dashboards: Vec<DashboardData>,
    pub auth_settings: AuthSettings,
}

/// Top-level fields of a snapshot; whatever is present replaces the current
/// value wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStatePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboards: Option<Vec<DashboardData>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_settings: Option<AuthSettings>,
}

impl GlobalState {
    pub fn merge(&self, patch: &GlobalStatePatch) -> Self {
        Self {
            dashboards: patch
                .dashboards
                .clone()
                .unwrap_or_else(|| self.dashboards.clone()),
            auth_settings: patch
                .auth_settings
                .clone()
                .unwrap_or_else(|| self.auth_settings.clone()),
        }
    }

    pub fn dashboard(&self, dashboard_id: &str) -> Option<&DashboardData> {
        self.dashboards.iter().find(|d| d.id() == dashboard_id)
    }

    pub fn container(&self, dashboard_id: &str, container_id: &str) -> Option<&ContainerData> {
        self.dashboard(dashboard_id)?.container(container_id)
    }

    /// Copy of the state without cached endpoint responses
    pub fn to_persisted(&self) -> Self {
        let mut persisted = self.clone();
        for dashboard in &mut persisted.dashboards {
            for container in &mut dashboard.containers {
                for component in &mut container.components {
                    component.dynamic_data = None;
                }
            }
        }
        persisted
    }
}

impl From<GlobalState> for GlobalStatePatch {
    fn from(state: GlobalState) -> Self {
        Self {
            dashboards: Some(state.dashboards),
            auth_settings: Some(state.auth_settings),
        }
    }
}
