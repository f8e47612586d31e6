// Container manager - component (endpoint) operations for one container
use crate::application::command::Command;
use crate::application::dashboard_manager::replace_if_changed;
use crate::application::store::{StateStore, SubscriptionId};
use crate::domain::component::{ComponentData, ComponentDefinition, ComponentPatch};
use crate::domain::container::{ApiDefinition, ContainerData, ContainerPatch};
use crate::domain::ids::{generate_id, IdKind};
use std::sync::{Arc, Mutex};

pub const NEW_ENDPOINT_URL: &str = "/new-endpoint";
pub const DEFAULT_VERB: &str = "GET";

#[derive(Clone)]
pub struct ContainerManager {
    store: Arc<StateStore>,
    dashboard_id: String,
    container_id: String,
}

impl ContainerManager {
    pub fn new(store: Arc<StateStore>, dashboard_id: String, container_id: String) -> Self {
        Self {
            store,
            dashboard_id,
            container_id,
        }
    }

    pub fn get_container(&self) -> Option<ContainerData> {
        self.store
            .get_state()
            .container(&self.dashboard_id, &self.container_id)
            .cloned()
    }

    pub fn list_components(&self) -> Vec<ComponentDefinition> {
        self.get_container()
            .map(|c| {
                c.components
                    .into_iter()
                    .map(|component| component.component_definition)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn update_title(&self, title: &str) {
        self.update(ContainerPatch {
            title: Some(title.to_string()),
            api_definition: None,
        });
    }

    pub fn import_api_definition(&self, api_definition: ApiDefinition) {
        self.update(ContainerPatch {
            title: None,
            api_definition: Some(api_definition),
        });
    }

    /// Append a component built from `draft`, filling unset fields with
    /// defaults. Returns `None` when the container does not exist.
    pub fn add_endpoint(&self, draft: ComponentPatch) -> Option<ComponentDefinition> {
        let container = self.get_container()?;
        let definition = ComponentDefinition {
            id: generate_id(IdKind::Component),
            title: draft.title,
            endpoint_url: draft
                .endpoint_url
                .unwrap_or_else(|| NEW_ENDPOINT_URL.to_string()),
            verb: draft.verb.unwrap_or_else(|| DEFAULT_VERB.to_string()),
            component_type: draft.component_type.unwrap_or_default(),
            order: container.components.len() as u32 + 1,
            pinned: draft.pinned.unwrap_or(false),
            other_settings: draft.other_settings.unwrap_or_default(),
        };

        self.store.dispatch(Command::AddComponent {
            dashboard_id: self.dashboard_id.clone(),
            container_id: self.container_id.clone(),
            component: ComponentData::new(definition.clone()),
        });
        Some(definition)
    }

    pub fn update_endpoint(&self, component_id: &str, patch: ComponentPatch) {
        self.store.dispatch(Command::UpdateComponent {
            dashboard_id: self.dashboard_id.clone(),
            container_id: self.container_id.clone(),
            component_id: component_id.to_string(),
            patch,
        });
    }

    pub fn delete_endpoint(&self, component_id: &str) {
        self.store.dispatch(Command::RemoveComponent {
            dashboard_id: self.dashboard_id.clone(),
            container_id: self.container_id.clone(),
            component_id: component_id.to_string(),
        });
    }

    /// Called with this container whenever it changes
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&ContainerData) + Send + Sync + 'static,
    {
        let dashboard_id = self.dashboard_id.clone();
        let container_id = self.container_id.clone();
        let last_seen = Mutex::new(self.get_container());
        self.store.subscribe(move |state| {
            if let Some(container) = state.container(&dashboard_id, &container_id) {
                if replace_if_changed(&last_seen, container) {
                    callback(container);
                }
            }
        })
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    fn update(&self, patch: ContainerPatch) {
        self.store.dispatch(Command::UpdateContainer {
            dashboard_id: self.dashboard_id.clone(),
            container_id: self.container_id.clone(),
            patch,
        });
    }
}
