//! Manipulation handles for the selected building.
//!
//! The transform gizmo lives in the plan view (and the perspective view when
//! 3D gizmos are on) and resizes or rotates the footprint. The section gizmo
//! lives in the section view and edits wall height, ridge, slope and eave.
//! Both are pure state machines fed by thin systems.

/// Section handle drag math, numeric edits and double-click detection.
pub mod section;

/// Section handle entities, level lines, labels and pointer wiring.
pub mod section_systems;

/// Transform handle drag math and hover/drag state.
pub mod transform;

/// Transform handle entities and pointer wiring.
pub mod transform_systems;

use bevy::prelude::*;

use crate::engine::core::app_state::EditorSet;
use section::SectionGizmo;
use section_systems::{
    apply_numeric_input, layout_section_handles, section_gizmo_interaction,
    spawn_section_handles,
};
use transform::TransformGizmo;
use transform_systems::{
    layout_transform_handles, spawn_transform_handles, transform_gizmo_interaction,
};

pub struct GizmoPlugin;

impl Plugin for GizmoPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TransformGizmo>()
            .init_resource::<SectionGizmo>()
            .add_systems(Startup, (spawn_transform_handles, spawn_section_handles))
            .add_systems(
                Update,
                (
                    (transform_gizmo_interaction, section_gizmo_interaction, apply_numeric_input)
                        .chain()
                        .in_set(EditorSet::Gizmos),
                    (layout_transform_handles, layout_section_handles).in_set(EditorSet::Layout),
                ),
            );
    }
}
