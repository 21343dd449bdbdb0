use bevy::prelude::*;

use super::model::{BuildingId, BuildingPatch};
use super::store::{AddBuilding, BuildingStore, SelectBuilding, UpdateBuilding};
use super::sync::{BuildingPart, MeshOwner};
use crate::engine::assets::editor_config::EditorConfig;
use crate::engine::camera::viewports::ViewKind;
use crate::engine::picking::pick::{PickKind, Pickables, pick};
use crate::engine::picking::pointer::PointerState;
use crate::engine::presentation::policy::ViewSettings;
use crate::tools::gizmo::section::SectionGizmo;
use crate::tools::gizmo::transform::TransformGizmo;
use crate::tools::tool_manager::ToolManager;
use crate::tools::ui::numeric_input::NumericInputState;

/// Move drag of the selected building, anchored at the pointer-down point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveDrag {
    pub building: BuildingId,
    pub start_ground: Vec3,
    pub init_position: Vec3,
}

impl MoveDrag {
    /// Position patch for the pointer at `ground`. Height is kept.
    pub fn update(&self, ground: Vec3) -> BuildingPatch {
        let delta = ground - self.start_ground;
        BuildingPatch {
            position: Some(self.init_position + Vec3::new(delta.x, 0.0, delta.z)),
            ..default()
        }
    }
}

/// What a primary press in the plan or perspective view does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PressOutcome {
    Place(Vec3),
    Select(BuildingId),
    StartMove(MoveDrag),
    ClearSelection,
    Nothing,
}

pub fn resolve_press(
    placing: bool,
    picked: Option<BuildingId>,
    selected: Option<(BuildingId, Vec3)>,
    ground: Option<Vec3>,
) -> PressOutcome {
    if placing {
        return ground.map_or(PressOutcome::Nothing, PressOutcome::Place);
    }
    match (picked, selected, ground) {
        (Some(id), Some((selected_id, position)), Some(ground)) if id == selected_id => {
            PressOutcome::StartMove(MoveDrag {
                building: id,
                start_ground: ground,
                init_position: position,
            })
        }
        (Some(id), _, _) => PressOutcome::Select(id),
        (None, _, _) => PressOutcome::ClearSelection,
    }
}

/// Placement clicks, body selection and move drags.
pub fn building_pointer_interaction(
    pointer: Res<PointerState>,
    settings: Res<ViewSettings>,
    tools: Res<ToolManager>,
    config: Res<EditorConfig>,
    store: Res<BuildingStore>,
    transform_gizmo: Res<TransformGizmo>,
    section_gizmo: Res<SectionGizmo>,
    numeric_input: Res<NumericInputState>,
    pickables: Pickables,
    parts: Query<&BuildingPart>,
    mut adds: EventWriter<AddBuilding>,
    mut selections: EventWriter<SelectBuilding>,
    mut updates: EventWriter<UpdateBuilding>,
    mut dragging: Local<Option<MoveDrag>>,
) {
    if numeric_input.is_open() || transform_gizmo.is_dragging() || section_gizmo.is_dragging() {
        *dragging = None;
        return;
    }

    if let Some(drag) = *dragging {
        if let Some(ground) = pointer.ground {
            let patch = drag.update(ground);
            if store.get(drag.building).map(|b| b.position) != patch.position {
                updates.write(UpdateBuilding { id: drag.building, patch });
            }
        }
        if pointer.just_released || store.selected() != Some(drag.building) {
            debug!("Move drag ended for {}", drag.building);
            *dragging = None;
        }
        return;
    }

    if !pointer.just_pressed {
        return;
    }
    let Some(view) = pointer.view.filter(|view| *view != ViewKind::Section) else {
        return;
    };

    let placement = tools.mode().placement_kind();
    let picked = if placement.is_some() {
        None
    } else {
        pointer.ray.and_then(|ray| {
            pick(
                ray,
                &view.camera_layers(&settings),
                pickables.iter(),
                |entity, bounds| {
                    bounds.kind == PickKind::Body
                        && parts.get(entity).is_ok_and(|p| matches!(p.owner, MeshOwner::Building(_)))
                },
            )
        })
        .and_then(|hit| match parts.get(hit.entity).ok()?.owner {
            MeshOwner::Building(id) => Some(id),
            MeshOwner::Ghost => None,
        })
    };
    let selected = store.selected_building().map(|b| (b.id, b.position));

    match resolve_press(placement.is_some(), picked, selected, pointer.ground) {
        PressOutcome::Place(ground) => {
            if let Some(kind) = placement {
                adds.write(AddBuilding(config.building_params(kind, ground)));
            }
        }
        PressOutcome::Select(id) => {
            selections.write(SelectBuilding(Some(id)));
        }
        PressOutcome::StartMove(drag) => {
            debug!("Move drag started for {}", drag.building);
            *dragging = Some(drag);
        }
        PressOutcome::ClearSelection => {
            if store.selected().is_some() {
                selections.write(SelectBuilding(None));
            }
        }
        PressOutcome::Nothing => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUND: Vec3 = Vec3::new(2.0, 0.0, 3.0);

    #[test]
    fn placement_needs_a_ground_point() {
        assert_eq!(resolve_press(true, None, None, Some(GROUND)), PressOutcome::Place(GROUND));
        assert_eq!(resolve_press(true, None, None, None), PressOutcome::Nothing);
    }

    #[test]
    fn press_selects_moves_or_clears() {
        let a = BuildingId(1);
        let b = BuildingId(2);
        assert_eq!(resolve_press(false, Some(a), None, Some(GROUND)), PressOutcome::Select(a));
        assert_eq!(
            resolve_press(false, Some(a), Some((b, Vec3::ZERO)), Some(GROUND)),
            PressOutcome::Select(a)
        );
        assert!(matches!(
            resolve_press(false, Some(a), Some((a, Vec3::ZERO)), Some(GROUND)),
            PressOutcome::StartMove(MoveDrag { building, .. }) if building == a
        ));
        assert_eq!(resolve_press(false, None, Some((a, Vec3::ZERO)), Some(GROUND)), PressOutcome::ClearSelection);
    }

    #[test]
    fn move_drag_follows_ground_delta() {
        let drag = MoveDrag {
            building: BuildingId(1),
            start_ground: Vec3::new(1.0, 0.0, 1.0),
            init_position: Vec3::new(5.0, 0.0, 5.0),
        };
        let patch = drag.update(Vec3::new(3.0, 0.0, -1.0));
        assert_eq!(patch.position, Some(Vec3::new(7.0, 0.0, 3.0)));
        assert!(patch.width.is_none());
    }
}
