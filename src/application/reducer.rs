// Reducer - pure state transitions, one snapshot in, one snapshot out
use crate::application::command::Command;
use crate::domain::component::ComponentData;
use crate::domain::container::ContainerData;
use crate::domain::dashboard::DashboardData;
use crate::domain::state::GlobalState;

/// Apply a command to a snapshot. References to unknown ids leave the
/// snapshot unchanged.
pub fn reduce(state: &GlobalState, command: &Command) -> GlobalState {
    match command {
        Command::AddDashboard(dashboard) => {
            let mut next = state.clone();
            next.dashboards.push(dashboard.clone());
            next
        }
        Command::UpdateDashboardTitle {
            dashboard_id,
            title,
        } => map_dashboard(state, dashboard_id, |d| {
            d.dashboard_settings.title = title.clone();
        }),
        Command::RemoveDashboard { dashboard_id } => {
            let mut next = state.clone();
            next.dashboards.retain(|d| d.id() != dashboard_id);
            next
        }
        Command::AddContainer {
            dashboard_id,
            container,
        } => map_dashboard(state, dashboard_id, |d| {
            d.containers.push(container.clone());
        }),
        Command::UpdateContainer {
            dashboard_id,
            container_id,
            patch,
        } => map_container(state, dashboard_id, container_id, |c| {
            if let Some(title) = &patch.title {
                c.container_settings.title = title.clone();
            }
            if let Some(api_definition) = &patch.api_definition {
                c.container_settings.api_definition = api_definition.clone();
            }
        }),
        Command::RemoveContainer {
            dashboard_id,
            container_id,
        } => map_dashboard(state, dashboard_id, |d| {
            if let Some(index) = d.containers.iter().position(|c| c.id() == container_id) {
                d.containers.remove(index);
            }
        }),
        Command::AddComponent {
            dashboard_id,
            container_id,
            component,
        } => map_container(state, dashboard_id, container_id, |c| {
            c.components.push(component.clone());
        }),
        Command::UpdateComponent {
            dashboard_id,
            container_id,
            component_id,
            patch,
        } => map_component(state, dashboard_id, container_id, component_id, |component| {
            component.component_definition = component.component_definition.merge(patch);
        }),
        Command::RemoveComponent {
            dashboard_id,
            container_id,
            component_id,
        } => map_container(state, dashboard_id, container_id, |c| {
            c.components.retain(|component| component.id() != component_id);
        }),
        Command::UpdateDynamicData {
            dashboard_id,
            container_id,
            component_id,
            data,
        } => map_component(state, dashboard_id, container_id, component_id, |component| {
            component.dynamic_data = Some(data.clone());
        }),
        Command::UpdateAuthSettings(patch) => GlobalState {
            dashboards: state.dashboards.clone(),
            auth_settings: state.auth_settings.merge(patch),
        },
        Command::LoadState(patch) => state.merge(patch),
    }
}

fn map_dashboard<F>(state: &GlobalState, dashboard_id: &str, update: F) -> GlobalState
where
    F: FnOnce(&mut DashboardData),
{
    let mut next = state.clone();
    if let Some(dashboard) = next.dashboards.iter_mut().find(|d| d.id() == dashboard_id) {
        update(dashboard);
    }
    next
}

fn map_container<F>(
    state: &GlobalState,
    dashboard_id: &str,
    container_id: &str,
    update: F,
) -> GlobalState
where
    F: FnOnce(&mut ContainerData),
{
    map_dashboard(state, dashboard_id, |dashboard| {
        if let Some(container) = dashboard
            .containers
            .iter_mut()
            .find(|c| c.id() == container_id)
        {
            update(container);
        }
    })
}

fn map_component<F>(
    state: &GlobalState,
    dashboard_id: &str,
    container_id: &str,
    component_id: &str,
    update: F,
) -> GlobalState
where
    F: FnOnce(&mut ComponentData),
{
    map_container(state, dashboard_id, container_id, |container| {
        if let Some(component) = container
            .components
            .iter_mut()
            .find(|c| c.id() == component_id)
        {
            update(component);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::{AuthSettings, AuthSettingsPatch};
    use crate::domain::component::{ComponentDefinition, ComponentPatch, ComponentSettings, ComponentType};
    use crate::domain::container::{ApiDefinition, ContainerPatch};
    use crate::domain::state::GlobalStatePatch;
    use serde_json::json;

    fn dashboard(id: &str, title: &str) -> DashboardData {
        DashboardData::new(id.to_string(), title.to_string(), "grid".to_string())
    }

    fn container(id: &str) -> ContainerData {
        ContainerData::new(id.to_string(), "C".to_string(), ApiDefinition::default())
    }

    fn component(id: &str) -> ComponentData {
        ComponentData::new(ComponentDefinition {
            id: id.to_string(),
            title: None,
            endpoint_url: "/items".to_string(),
            verb: "GET".to_string(),
            component_type: ComponentType::List,
            order: 1,
            pinned: false,
            other_settings: ComponentSettings::default(),
        })
    }

    fn with_container() -> GlobalState {
        let state = reduce(&GlobalState::default(), &Command::AddDashboard(dashboard("dashboard-1", "A")));
        reduce(
            &state,
            &Command::AddContainer {
                dashboard_id: "dashboard-1".to_string(),
                container: container("c1"),
            },
        )
    }

    fn with_component() -> GlobalState {
        reduce(
            &with_container(),
            &Command::AddComponent {
                dashboard_id: "dashboard-1".to_string(),
                container_id: "c1".to_string(),
                component: component("x1"),
            },
        )
    }

    #[test]
    fn test_add_dashboard_preserves_insertion_order() {
        let mut state = GlobalState::default();
        for i in 0..5 {
            state = reduce(&state, &Command::AddDashboard(dashboard(&format!("dashboard-{}", i), "T")));
        }

        assert_eq!(state.dashboards.len(), 5);
        let ids: Vec<&str> = state.dashboards.iter().map(|d| d.id()).collect();
        assert_eq!(ids, vec!["dashboard-0", "dashboard-1", "dashboard-2", "dashboard-3", "dashboard-4"]);
    }

    #[test]
    fn test_add_dashboard_scenario() {
        let state = reduce(&GlobalState::default(), &Command::AddDashboard(dashboard("dashboard-1", "A")));
        assert_eq!(state.dashboards.len(), 1);
        assert_eq!(state.dashboards[0].title(), "A");
    }

    #[test]
    fn test_update_title() {
        let state = reduce(
            &with_container(),
            &Command::UpdateDashboardTitle {
                dashboard_id: "dashboard-1".to_string(),
                title: "Renamed".to_string(),
            },
        );
        assert_eq!(state.dashboards[0].title(), "Renamed");
    }

    #[test]
    fn test_update_title_unknown_id_is_noop() {
        let before = with_container();
        let after = reduce(
            &before,
            &Command::UpdateDashboardTitle {
                dashboard_id: "missing".to_string(),
                title: "Renamed".to_string(),
            },
        );
        assert_eq!(after, before);
    }

    #[test]
    fn test_add_then_remove_container_round_trip() {
        let before = reduce(&GlobalState::default(), &Command::AddDashboard(dashboard("dashboard-1", "A")));
        let added = reduce(
            &before,
            &Command::AddContainer {
                dashboard_id: "dashboard-1".to_string(),
                container: container("c1"),
            },
        );
        assert_eq!(added.dashboards[0].containers.len(), 1);

        let removed = reduce(
            &added,
            &Command::RemoveContainer {
                dashboard_id: "dashboard-1".to_string(),
                container_id: "c1".to_string(),
            },
        );
        assert!(removed.dashboards[0].containers.is_empty());
        assert_eq!(removed, before);
    }

    #[test]
    fn test_remove_container_removes_only_first_match() {
        let state = reduce(
            &with_container(),
            &Command::AddContainer {
                dashboard_id: "dashboard-1".to_string(),
                container: container("c1"),
            },
        );
        let state = reduce(
            &state,
            &Command::RemoveContainer {
                dashboard_id: "dashboard-1".to_string(),
                container_id: "c1".to_string(),
            },
        );
        assert_eq!(state.dashboards[0].containers.len(), 1);
    }

    #[test]
    fn test_add_container_to_unknown_dashboard_is_noop() {
        let before = with_container();
        let after = reduce(
            &before,
            &Command::AddContainer {
                dashboard_id: "missing".to_string(),
                container: container("c2"),
            },
        );
        assert_eq!(after, before);
    }

    #[test]
    fn test_update_auth_settings_merges() {
        let state = reduce(
            &GlobalState::default(),
            &Command::UpdateAuthSettings(AuthSettingsPatch {
                client_id: Some("X".to_string()),
                ..Default::default()
            }),
        );

        let defaults = AuthSettings::default();
        assert_eq!(state.auth_settings.client_id, "X");
        assert_eq!(state.auth_settings.auth_url, defaults.auth_url);
        assert_eq!(state.auth_settings.response_type, defaults.response_type);
        assert_eq!(state.auth_settings.scope, defaults.scope);
    }

    #[test]
    fn test_load_state_round_trip() {
        let before = with_component();
        let saved = serde_json::to_value(&before).unwrap();
        let patch: GlobalStatePatch = serde_json::from_value(saved).unwrap();

        let reloaded = reduce(&GlobalState::default(), &Command::LoadState(patch));
        assert_eq!(reloaded, before);
    }

    #[test]
    fn test_load_state_is_merge_not_replace() {
        let current = reduce(
            &GlobalState::default(),
            &Command::UpdateAuthSettings(AuthSettingsPatch {
                scope: Some("API".to_string()),
                ..Default::default()
            }),
        );
        let patch: GlobalStatePatch = serde_json::from_value(json!({ "dashboards": [] })).unwrap();

        let loaded = reduce(&current, &Command::LoadState(patch));
        assert_eq!(loaded.auth_settings.scope, "API");
    }

    #[test]
    fn test_update_container_patch() {
        let state = reduce(
            &with_container(),
            &Command::UpdateContainer {
                dashboard_id: "dashboard-1".to_string(),
                container_id: "c1".to_string(),
                patch: ContainerPatch {
                    title: Some("Users API".to_string()),
                    api_definition: Some(ApiDefinition::new("https://api.example.com", true)),
                },
            },
        );

        let settings = &state.dashboards[0].containers[0].container_settings;
        assert_eq!(settings.title, "Users API");
        assert!(settings.api_definition.requires_auth());
    }

    #[test]
    fn test_component_lifecycle() {
        let state = with_component();
        assert_eq!(state.dashboards[0].containers[0].components.len(), 1);

        let state = reduce(
            &state,
            &Command::UpdateComponent {
                dashboard_id: "dashboard-1".to_string(),
                container_id: "c1".to_string(),
                component_id: "x1".to_string(),
                patch: ComponentPatch {
                    pinned: Some(true),
                    ..Default::default()
                },
            },
        );
        assert!(state.dashboards[0].containers[0].components[0].component_definition.pinned);

        let state = reduce(
            &state,
            &Command::UpdateDynamicData {
                dashboard_id: "dashboard-1".to_string(),
                container_id: "c1".to_string(),
                component_id: "x1".to_string(),
                data: json!(["a", "b"]),
            },
        );
        assert_eq!(
            state.dashboards[0].containers[0].components[0].dynamic_data,
            Some(json!(["a", "b"]))
        );

        let state = reduce(
            &state,
            &Command::RemoveComponent {
                dashboard_id: "dashboard-1".to_string(),
                container_id: "c1".to_string(),
                component_id: "x1".to_string(),
            },
        );
        assert!(state.dashboards[0].containers[0].components.is_empty());
    }

    #[test]
    fn test_remove_dashboard() {
        let state = reduce(
            &with_container(),
            &Command::RemoveDashboard {
                dashboard_id: "dashboard-1".to_string(),
            },
        );
        assert!(state.dashboards.is_empty());
    }
}
