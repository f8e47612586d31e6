// Component domain model - endpoint-backed widgets inside a container
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ComponentType {
    #[default]
    Text,
    Table,
    Button,
    List,
    ComboSelect,
}

/// Free-form component settings with the keys the view layer understands
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDefinition {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub endpoint_url: String,
    pub verb: String,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    /// Display position; older snapshots may omit it
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub other_settings: ComponentSettings,
}

/// Field-wise update for a component definition. The id is not patchable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verb: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub component_type: Option<ComponentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_settings: Option<ComponentSettings>,
}

impl ComponentDefinition {
    pub fn merge(&self, patch: &ComponentPatch) -> Self {
        Self {
            id: self.id.clone(),
            title: patch.title.clone().or_else(|| self.title.clone()),
            endpoint_url: patch
                .endpoint_url
                .clone()
                .unwrap_or_else(|| self.endpoint_url.clone()),
            verb: patch.verb.clone().unwrap_or_else(|| self.verb.clone()),
            component_type: patch.component_type.unwrap_or(self.component_type),
            order: patch.order.unwrap_or(self.order),
            pinned: patch.pinned.unwrap_or(self.pinned),
            other_settings: patch
                .other_settings
                .clone()
                .unwrap_or_else(|| self.other_settings.clone()),
        }
    }
}

/// A component definition plus its last fetched response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentData {
    pub component_definition: ComponentDefinition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_data: Option<Value>,
}

impl ComponentData {
    pub fn new(component_definition: ComponentDefinition) -> Self {
        Self {
            component_definition,
            dynamic_data: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.component_definition.id
    }
}
