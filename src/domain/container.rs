// Container domain model - cards grouping components on a dashboard
use super::component::ComponentData;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// API description attached to a container. Keys other than `baseUrl` and
/// `authRequired` are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_required: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApiDefinition {
    pub fn new(base_url: impl Into<String>, auth_required: bool) -> Self {
        Self {
            base_url: Some(base_url.into()),
            auth_required: Some(auth_required),
            extra: Map::new(),
        }
    }

    pub fn requires_auth(&self) -> bool {
        self.auth_required.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSettings {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub api_definition: ApiDefinition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerData {
    pub container_settings: ContainerSettings,
    #[serde(default)]
    pub components: Vec<ComponentData>,
}

impl ContainerData {
    pub fn new(id: String, title: String, api_definition: ApiDefinition) -> Self {
        Self {
            container_settings: ContainerSettings {
                id,
                title,
                api_definition,
            },
            components: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.container_settings.id
    }

    pub fn component(&self, component_id: &str) -> Option<&ComponentData> {
        self.components.iter().find(|c| c.id() == component_id)
    }
}

/// Container fields that can be changed after creation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_definition: Option<ApiDefinition>,
}
