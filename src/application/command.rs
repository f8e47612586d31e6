// Commands - tagged requests to transform the global state
use crate::domain::auth::AuthSettingsPatch;
use crate::domain::component::{ComponentData, ComponentPatch};
use crate::domain::container::{ContainerData, ContainerPatch};
use crate::domain::dashboard::DashboardData;
use crate::domain::state::GlobalStatePatch;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Command {
    AddDashboard(DashboardData),
    UpdateDashboardTitle {
        dashboard_id: String,
        title: String,
    },
    RemoveDashboard {
        dashboard_id: String,
    },
    AddContainer {
        dashboard_id: String,
        container: ContainerData,
    },
    UpdateContainer {
        dashboard_id: String,
        container_id: String,
        patch: ContainerPatch,
    },
    RemoveContainer {
        dashboard_id: String,
        container_id: String,
    },
    AddComponent {
        dashboard_id: String,
        container_id: String,
        component: ComponentData,
    },
    UpdateComponent {
        dashboard_id: String,
        container_id: String,
        component_id: String,
        patch: ComponentPatch,
    },
    RemoveComponent {
        dashboard_id: String,
        container_id: String,
        component_id: String,
    },
    UpdateDynamicData {
        dashboard_id: String,
        container_id: String,
        component_id: String,
        data: Value,
    },
    UpdateAuthSettings(AuthSettingsPatch),
    LoadState(GlobalStatePatch),
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("command envelope must be an object with a string `type`")]
    MissingType,
    #[error("invalid payload for {kind}: {source}")]
    InvalidPayload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Command {
    pub const KINDS: [&'static str; 12] = [
        "ADD_DASHBOARD",
        "UPDATE_DASHBOARD_TITLE",
        "REMOVE_DASHBOARD",
        "ADD_CONTAINER",
        "UPDATE_CONTAINER",
        "REMOVE_CONTAINER",
        "ADD_COMPONENT",
        "UPDATE_COMPONENT",
        "REMOVE_COMPONENT",
        "UPDATE_DYNAMIC_DATA",
        "UPDATE_AUTH_SETTINGS",
        "LOAD_STATE",
    ];

    /// Decode a `{type, payload}` envelope. An unrecognized `type` yields
    /// `Ok(None)` so callers can ignore it.
    pub fn decode(envelope: Value) -> Result<Option<Command>, CommandError> {
        let kind = envelope
            .get("type")
            .and_then(Value::as_str)
            .ok_or(CommandError::MissingType)?
            .to_string();

        if !Self::KINDS.contains(&kind.as_str()) {
            return Ok(None);
        }

        serde_json::from_value(envelope)
            .map(Some)
            .map_err(|source| CommandError::InvalidPayload { kind, source })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Command::AddDashboard(_) => "ADD_DASHBOARD",
            Command::UpdateDashboardTitle { .. } => "UPDATE_DASHBOARD_TITLE",
            Command::RemoveDashboard { .. } => "REMOVE_DASHBOARD",
            Command::AddContainer { .. } => "ADD_CONTAINER",
            Command::UpdateContainer { .. } => "UPDATE_CONTAINER",
            Command::RemoveContainer { .. } => "REMOVE_CONTAINER",
            Command::AddComponent { .. } => "ADD_COMPONENT",
            Command::UpdateComponent { .. } => "UPDATE_COMPONENT",
            Command::RemoveComponent { .. } => "REMOVE_COMPONENT",
            Command::UpdateDynamicData { .. } => "UPDATE_DYNAMIC_DATA",
            Command::UpdateAuthSettings(_) => "UPDATE_AUTH_SETTINGS",
            Command::LoadState(_) => "LOAD_STATE",
        }
    }
}
