//! Parametric buildings: the data model, derived geometry, the store that
//! owns them, and the systems that keep their meshes in step.
//!
//! ## Data Flow
//!
//! ```text
//! Pointer / gizmos / dialog
//!   └─> AddBuilding, UpdateBuilding, SelectBuilding, DeleteSelectedBuilding
//!       └─> apply_building_events()   (sole store writer)
//!           └─> sync_building_meshes() (rebuild or rescale)
//!               └─> apply_view_presentation()
//! ```

/// Wall, roof and guide dimensions derived from building parameters.
pub mod geometry;

/// Translucent placement preview following the cursor.
pub mod ghost;

/// Placement clicks, body selection and move drags.
pub mod interactions;

/// Mesh builders and the shared material cache.
pub mod meshes;

/// Building parameters, roof variants and partial updates.
pub mod model;

/// Building storage, selection and the events that edit them.
pub mod store;

/// Incremental mesh synchronisation with per-view proxies.
pub mod sync;

use bevy::prelude::*;

use crate::engine::core::app_state::EditorSet;
use ghost::{GhostPreview, update_ghost_preview};
use interactions::building_pointer_interaction;
use meshes::MaterialLibrary;
use store::{
    AddBuilding, BuildingStore, DeleteSelectedBuilding, SelectBuilding, UpdateBuilding,
    apply_building_events,
};
use sync::{MeshSets, sync_building_meshes};

// Registers the building store, events and mesh sync.
pub struct BuildingPlugin;

impl Plugin for BuildingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BuildingStore>()
            .init_resource::<GhostPreview>()
            .init_resource::<MeshSets>()
            .init_resource::<MaterialLibrary>()
            .add_event::<AddBuilding>()
            .add_event::<UpdateBuilding>()
            .add_event::<DeleteSelectedBuilding>()
            .add_event::<SelectBuilding>()
            .add_systems(
                Update,
                (
                    update_ghost_preview.in_set(EditorSet::Pointer),
                    building_pointer_interaction.in_set(EditorSet::Selection),
                    apply_building_events.in_set(EditorSet::Apply),
                    sync_building_meshes.in_set(EditorSet::Sync),
                ),
            );
    }
}
