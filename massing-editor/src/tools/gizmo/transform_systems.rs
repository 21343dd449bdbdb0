use bevy::prelude::*;
use bevy::render::view::RenderLayers;
use constants::gizmo::{
    BAR_LENGTH, BAR_THICKNESS, CORNER_SIZE, ROTATE_PUCK_DIAMETER, ROTATE_PUCK_HEIGHT,
};
use constants::interaction::TRANSFORM_GIZMO_LAYER;

use super::transform::{GizmoState, TransformGizmo, TransformHandle, handle_position};
use crate::engine::camera::viewports::ViewKind;
use crate::engine::picking::pick::{PickBounds, PickKind, Pickables, pick};
use crate::engine::picking::pointer::PointerState;
use crate::engine::presentation::policy::ViewSettings;
use crate::tools::building::model::{BuildingId, BuildingPatch};
use crate::tools::building::store::{BuildingStore, UpdateBuilding};
use crate::tools::ui::numeric_input::NumericInputState;

fn handle_size(handle: TransformHandle) -> Vec3 {
    match handle {
        TransformHandle::EdgeN | TransformHandle::EdgeS => {
            Vec3::new(BAR_LENGTH, BAR_THICKNESS, BAR_THICKNESS)
        }
        TransformHandle::EdgeE | TransformHandle::EdgeW => {
            Vec3::new(BAR_THICKNESS, BAR_THICKNESS, BAR_LENGTH)
        }
        TransformHandle::Rotate => {
            Vec3::new(ROTATE_PUCK_DIAMETER, ROTATE_PUCK_HEIGHT, ROTATE_PUCK_DIAMETER)
        }
        _ => Vec3::splat(CORNER_SIZE),
    }
}

fn handle_mesh(handle: TransformHandle) -> Mesh {
    match handle {
        TransformHandle::Rotate => {
            Mesh::from(Cylinder::new(ROTATE_PUCK_DIAMETER / 2.0, ROTATE_PUCK_HEIGHT))
        }
        _ => Mesh::from(Cuboid::from_size(handle_size(handle))),
    }
}

/// Spawns the nine hidden handles. Each owns its material so it can be
/// recoloured on hover and drag.
pub fn spawn_transform_handles(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for handle in TransformHandle::ALL {
        commands.spawn((
            Name::new(format!("Transform handle {}", handle.label())),
            handle,
            Mesh3d(meshes.add(handle_mesh(handle))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: handle.base_color(),
                unlit: true,
                ..default()
            })),
            PickBounds::new(handle_size(handle), Vec3::ZERO, PickKind::Gizmo),
            RenderLayers::layer(TRANSFORM_GIZMO_LAYER),
            Transform::default(),
            Visibility::Hidden,
        ));
    }
    debug!("Spawned {} transform handles", TransformHandle::ALL.len());
}

/// Views in which the handles can be grabbed.
fn interactive_view(view: ViewKind, settings: &ViewSettings) -> bool {
    match view {
        ViewKind::Plan => true,
        ViewKind::Perspective => settings.show_3d_gizmos,
        ViewKind::Section => false,
    }
}

/// Feeds the pointer into the gizmo state machine and emits resize and
/// rotate edits for the selected building.
pub fn transform_gizmo_interaction(
    pointer: Res<PointerState>,
    settings: Res<ViewSettings>,
    store: Res<BuildingStore>,
    numeric_input: Res<NumericInputState>,
    pickables: Pickables,
    handles: Query<&TransformHandle>,
    mut gizmo: ResMut<TransformGizmo>,
    mut updates: EventWriter<UpdateBuilding>,
    mut last_sent: Local<Option<(BuildingId, BuildingPatch)>>,
    mut last_selected: Local<Option<BuildingId>>,
) {
    let selected = store.selected_building().copied();
    let selection_changed = *last_selected != selected.map(|b| b.id);
    *last_selected = selected.map(|b| b.id);

    let Some(building) = selected else {
        if gizmo.state != GizmoState::Idle {
            gizmo.cancel();
        }
        return;
    };
    if selection_changed && gizmo.state != GizmoState::Idle {
        gizmo.cancel();
    }
    if numeric_input.is_open() {
        return;
    }

    let hit = pointer
        .view
        .filter(|view| interactive_view(*view, &settings))
        .zip(pointer.ray)
        .and_then(|(view, ray)| {
            pick(
                ray,
                &view.camera_layers(&settings),
                pickables.iter(),
                |entity, _| handles.contains(entity),
            )
        })
        .and_then(|hit| handles.get(hit.entity).ok().copied());

    let edit = if pointer.just_pressed {
        let on_gizmo_view = pointer.view.is_some_and(|view| interactive_view(view, &settings));
        if on_gizmo_view && gizmo.pointer_down(hit, pointer.ground, &building) {
            *last_sent = None;
        }
        None
    } else if pointer.just_released {
        let edit = gizmo.pointer_move(hit, pointer.ground);
        gizmo.pointer_up(hit);
        edit
    } else {
        gizmo.pointer_move(hit, pointer.ground)
    };

    if let Some((id, patch)) = edit {
        if *last_sent != Some((id, patch)) {
            updates.write(UpdateBuilding { id, patch });
            *last_sent = Some((id, patch));
        }
    }
}

/// Places the handles around the selected building and keeps their colours
/// in step with the gizmo state.
pub fn layout_transform_handles(
    store: Res<BuildingStore>,
    gizmo: Res<TransformGizmo>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut handles: Query<(
        &TransformHandle,
        &mut Transform,
        &mut Visibility,
        &MeshMaterial3d<StandardMaterial>,
    )>,
) {
    let selected = store.selected_building();
    for (handle, mut transform, mut visibility, material) in &mut handles {
        let Some(building) = selected else {
            visibility.set_if_neq(Visibility::Hidden);
            continue;
        };
        visibility.set_if_neq(Visibility::Inherited);
        transform.set_if_neq(
            Transform::from_translation(handle_position(*handle, building))
                .with_rotation(Quat::from_rotation_y(building.rotation)),
        );

        let color = gizmo.color(*handle);
        if materials.get(&material.0).is_some_and(|m| m.base_color != color) {
            if let Some(mat) = materials.get_mut(&material.0) {
                mat.base_color = color;
            }
        }
    }
}
