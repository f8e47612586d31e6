// Dashboard managers - command-issuing facades over the state store
use crate::application::command::Command;
use crate::application::container_manager::ContainerManager;
use crate::application::store::{StateStore, SubscriptionId};
use crate::domain::container::{ApiDefinition, ContainerData, ContainerPatch};
use crate::domain::dashboard::{DashboardData, DEFAULT_LAYOUT};
use crate::domain::ids::{generate_id, IdKind};
use std::sync::{Arc, Mutex};

pub const NEW_DASHBOARD_TITLE: &str = "New Dashboard";
pub const NEW_CONTAINER_TITLE: &str = "New Container";

#[derive(Clone)]
pub struct DashboardManager {
    store: Arc<StateStore>,
}

impl DashboardManager {
    pub fn new(store: Arc<StateStore>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Vec<DashboardData> {
        self.store.get_state().dashboards.clone()
    }

    pub fn add(&self, dashboard: DashboardData) {
        self.store.dispatch(Command::AddDashboard(dashboard));
    }

    /// Create an empty dashboard with a fresh id and add it
    pub fn new_dashboard(&self, title: Option<String>) -> DashboardData {
        let dashboard = DashboardData::new(
            generate_id(IdKind::Dashboard),
            title.unwrap_or_else(|| NEW_DASHBOARD_TITLE.to_string()),
            DEFAULT_LAYOUT.to_string(),
        );
        tracing::info!("Creating dashboard {}", dashboard.id());
        self.add(dashboard.clone());
        dashboard
    }

    pub fn remove(&self, dashboard_id: &str) {
        self.store.dispatch(Command::RemoveDashboard {
            dashboard_id: dashboard_id.to_string(),
        });
    }

    pub fn instance(&self, dashboard_id: &str) -> DashboardInstance {
        DashboardInstance::new(self.store.clone(), dashboard_id.to_string())
    }

    /// Called with the dashboard list after every state change
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&[DashboardData]) + Send + Sync + 'static,
    {
        self.store.subscribe(move |state| callback(&state.dashboards))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }
}

/// Operations scoped to a single dashboard
#[derive(Clone)]
pub struct DashboardInstance {
    store: Arc<StateStore>,
    dashboard_id: String,
}

impl DashboardInstance {
    pub fn new(store: Arc<StateStore>, dashboard_id: String) -> Self {
        Self {
            store,
            dashboard_id,
        }
    }

    pub fn get_dashboard(&self) -> Option<DashboardData> {
        self.store.get_state().dashboard(&self.dashboard_id).cloned()
    }

    pub fn list_containers(&self) -> Vec<ContainerData> {
        self.get_dashboard()
            .map(|d| d.containers)
            .unwrap_or_default()
    }

    pub fn add_container(&self, container: ContainerData) {
        self.store.dispatch(Command::AddContainer {
            dashboard_id: self.dashboard_id.clone(),
            container,
        });
    }

    /// Add an empty container expecting an authenticated API
    pub fn new_container(&self, title: Option<String>) -> ContainerData {
        let container = ContainerData::new(
            generate_id(IdKind::Container),
            title.unwrap_or_else(|| NEW_CONTAINER_TITLE.to_string()),
            ApiDefinition::new("", true),
        );
        self.add_container(container.clone());
        container
    }

    pub fn update_container(&self, container_id: &str, patch: ContainerPatch) {
        self.store.dispatch(Command::UpdateContainer {
            dashboard_id: self.dashboard_id.clone(),
            container_id: container_id.to_string(),
            patch,
        });
    }

    pub fn remove_container(&self, container_id: &str) {
        self.store.dispatch(Command::RemoveContainer {
            dashboard_id: self.dashboard_id.clone(),
            container_id: container_id.to_string(),
        });
    }

    pub fn update_title(&self, title: &str) {
        self.store.dispatch(Command::UpdateDashboardTitle {
            dashboard_id: self.dashboard_id.clone(),
            title: title.to_string(),
        });
    }

    pub fn container(&self, container_id: &str) -> ContainerManager {
        ContainerManager::new(
            self.store.clone(),
            self.dashboard_id.clone(),
            container_id.to_string(),
        )
    }

    /// Called with this dashboard whenever it changes. Changes elsewhere in
    /// the state and removal of the dashboard are not reported.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DashboardData) + Send + Sync + 'static,
    {
        let dashboard_id = self.dashboard_id.clone();
        let last_seen = Mutex::new(self.get_dashboard());
        self.store.subscribe(move |state| {
            if let Some(dashboard) = state.dashboard(&dashboard_id) {
                if replace_if_changed(&last_seen, dashboard) {
                    callback(dashboard);
                }
            }
        })
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }
}

/// Store `current` as the last seen value, returning whether it differed
pub(crate) fn replace_if_changed<T: Clone + PartialEq>(
    last_seen: &Mutex<Option<T>>,
    current: &T,
) -> bool {
    let mut last = last_seen.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if last.as_ref() == Some(current) {
        return false;
    }
    *last = Some(current.clone());
    true
}
