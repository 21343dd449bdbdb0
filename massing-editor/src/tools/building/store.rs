use bevy::prelude::*;

use super::model::{Building, BuildingId, BuildingParams, BuildingPatch};
use crate::tools::tool_manager::{InteractionMode, ToolManager};

/// Every building in the scene plus the current selection.
#[derive(Resource, Debug)]
pub struct BuildingStore {
    pub buildings: Vec<Building>,
    next_id: u64,
    selected: Option<BuildingId>,
}

impl Default for BuildingStore {
    fn default() -> Self {
        Self {
            buildings: Vec::new(),
            next_id: 1,
            selected: None,
        }
    }
}

impl BuildingStore {
    pub fn insert_new(&mut self, params: BuildingParams) -> BuildingId {
        let id = BuildingId(self.next_id);
        self.next_id += 1;
        self.buildings.push(Building::new(id, params));
        id
    }

    pub fn get(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.iter().find(|b| b.id == id)
    }

    /// Returns false when no building has this id.
    pub fn apply_patch(&mut self, id: BuildingId, patch: &BuildingPatch) -> bool {
        match self.buildings.iter_mut().find(|b| b.id == id) {
            Some(building) => {
                patch.apply(building);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: BuildingId) -> Option<Building> {
        let index = self.buildings.iter().position(|b| b.id == id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Some(self.buildings.remove(index))
    }

    /// Returns false, leaving the selection unchanged, for an unknown id.
    pub fn select(&mut self, id: Option<BuildingId>) -> bool {
        if let Some(id) = id {
            if self.get(id).is_none() {
                return false;
            }
        }
        self.selected = id;
        true
    }

    pub fn selected(&self) -> Option<BuildingId> {
        self.selected
    }

    pub fn selected_building(&self) -> Option<&Building> {
        self.selected.and_then(|id| self.get(id))
    }
}

/// Create a building and select it.
#[derive(Event, Debug, Clone, Copy)]
pub struct AddBuilding(pub BuildingParams);

#[derive(Event, Debug, Clone, Copy)]
pub struct UpdateBuilding {
    pub id: BuildingId,
    pub patch: BuildingPatch,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct DeleteSelectedBuilding;

#[derive(Event, Debug, Clone, Copy)]
pub struct SelectBuilding(pub Option<BuildingId>);

/// Sole writer of the building store.
pub fn apply_building_events(
    mut store: ResMut<BuildingStore>,
    mut tool_manager: ResMut<ToolManager>,
    mut adds: EventReader<AddBuilding>,
    mut selections: EventReader<SelectBuilding>,
    mut updates: EventReader<UpdateBuilding>,
    mut deletes: EventReader<DeleteSelectedBuilding>,
) {
    for AddBuilding(params) in adds.read() {
        let id = store.insert_new(*params);
        store.select(Some(id));
        tool_manager.activate_mode(InteractionMode::Select);
        info!(
            "Added {} ({} roof) at ({:.2}, {:.2})",
            id,
            params.roof.kind(),
            params.position.x,
            params.position.z
        );
    }

    for SelectBuilding(id) in selections.read() {
        if store.selected() == *id {
            continue;
        }
        if store.select(*id) {
            match id {
                Some(id) => info!("Selected {}", id),
                None => debug!("Selection cleared"),
            }
        } else if let Some(id) = id {
            warn!("Cannot select unknown {}", id);
        }
    }

    for UpdateBuilding { id, patch } in updates.read() {
        if patch.is_empty() {
            continue;
        }
        if !store.apply_patch(*id, patch) {
            warn!("Dropped update for unknown {}", id);
        }
    }

    for _ in deletes.read() {
        let Some(id) = store.selected() else {
            debug!("Delete requested with nothing selected");
            continue;
        };
        if store.remove(id).is_some() {
            info!("Deleted {}", id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::model::Roof;
    use super::*;

    fn params(x: f32) -> BuildingParams {
        BuildingParams {
            position: Vec3::new(x, 0.0, 0.0),
            rotation: 0.0,
            wall_height: 3.0,
            extension: 0.15,
            roof: Roof::Flat { width: 3.0, length: 3.0, thickness: 0.15 },
        }
    }

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<BuildingStore>()
            .init_resource::<ToolManager>()
            .add_event::<AddBuilding>()
            .add_event::<UpdateBuilding>()
            .add_event::<DeleteSelectedBuilding>()
            .add_event::<SelectBuilding>()
            .add_systems(Update, apply_building_events);
        app
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut store = BuildingStore::default();
        let a = store.insert_new(params(0.0));
        let b = store.insert_new(params(1.0));
        store.remove(a);
        let c = store.insert_new(params(2.0));
        assert!(a < b && b < c);
    }

    #[test]
    fn removing_selected_clears_selection() {
        let mut store = BuildingStore::default();
        let id = store.insert_new(params(0.0));
        assert!(store.select(Some(id)));
        assert!(store.remove(id).is_some());
        assert_eq!(store.selected(), None);
        assert!(!store.select(Some(id)));
    }

    #[test]
    fn add_event_selects_and_returns_to_select_mode() {
        let mut app = app();
        app.world_mut().resource_mut::<ToolManager>().activate_mode(InteractionMode::PlaceFlat);
        app.world_mut().send_event(AddBuilding(params(4.0)));
        app.update();

        let store = app.world().resource::<BuildingStore>();
        assert_eq!(store.buildings.len(), 1);
        let selected = store.selected_building().unwrap();
        assert_eq!(selected.position.x, 4.0);
        assert!(app.world().resource::<ToolManager>().is_mode_active(InteractionMode::Select));
    }

    #[test]
    fn update_and_delete_events_reach_the_store() {
        let mut app = app();
        app.world_mut().send_event(AddBuilding(params(0.0)));
        app.update();
        let id = app.world().resource::<BuildingStore>().buildings[0].id;

        app.world_mut().send_event(UpdateBuilding {
            id,
            patch: BuildingPatch { wall_height: Some(6.0), ..default() },
        });
        app.update();
        assert_eq!(app.world().resource::<BuildingStore>().buildings[0].wall_height, 6.0);

        app.world_mut().send_event(UpdateBuilding {
            id: BuildingId(99),
            patch: BuildingPatch { wall_height: Some(1.0), ..default() },
        });
        app.world_mut().send_event(DeleteSelectedBuilding);
        app.update();
        assert!(app.world().resource::<BuildingStore>().buildings.is_empty());
    }
}
