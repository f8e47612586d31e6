// Dashboard domain model
use super::container::ContainerData;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LAYOUT: &str = "grid";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSettings {
    pub id: String,
    pub title: String,
    #[serde(default = "default_layout")]
    pub layout: String,
}

fn default_layout() -> String {
    DEFAULT_LAYOUT.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub dashboard_settings: DashboardSettings,
    #[serde(default)]
    pub containers: Vec<ContainerData>,
}

impl DashboardData {
    pub fn new(id: String, title: String, layout: String) -> Self {
        Self {
            dashboard_settings: DashboardSettings { id, title, layout },
            containers: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.dashboard_settings.id
    }

    pub fn title(&self) -> &str {
        &self.dashboard_settings.title
    }

    pub fn container(&self, container_id: &str) -> Option<&ContainerData> {
        self.containers.iter().find(|c| c.id() == container_id)
    }
}
