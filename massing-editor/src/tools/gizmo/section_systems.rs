use bevy::prelude::*;
use bevy::render::view::RenderLayers;
use constants::camera::SECTION_CAMERA_DISTANCE;
use constants::interaction::SECTION_GIZMO_LAYER;
use constants::section_gizmo::{HANDLE_PADDING, HANDLE_SCALE, LINE_COLOR, LINE_OVERSHOOT};

use super::section::{
    SectionDrag, SectionGizmo, SectionGizmoState, SectionHandle, numeric_patch, numeric_request,
};
use crate::engine::camera::viewports::{SectionRig, ViewKind, ViewportLayout};
use crate::engine::picking::pick::{PickBounds, PickKind, Pickables, pick};
use crate::engine::picking::pointer::PointerState;
use crate::engine::picking::ray::world_to_viewport;
use crate::engine::presentation::policy::ViewSettings;
use crate::tools::building::meshes::{dashed_segments, line_list_mesh};
use crate::tools::building::model::{BuildingId, BuildingPatch};
use crate::tools::building::store::{BuildingStore, UpdateBuilding};
use crate::tools::ui::numeric_input::{
    NumericAction, NumericInputRequested, NumericInputState, NumericInputSubmitted,
};

/// Dashed horizontal line through a handle.
#[derive(Component, Debug, Clone, Copy)]
pub struct SectionLevelLine {
    pub handle: SectionHandle,
    /// Half length and dash scale the mesh was built for.
    built_for: Option<(f32, f32)>,
}

/// Screen-space value label next to a handle.
#[derive(Component, Debug, Clone, Copy)]
pub struct SectionHandleLabel(pub SectionHandle);

/// Where the section camera currently looks, in world terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionFrame {
    /// Target at ground level, pulled towards the camera so handles draw
    /// in front of the building.
    origin: Vec3,
    left: Vec3,
    pub rotation: Quat,
    pub half_width: f32,
    /// Handle edge length in metres.
    pub scale: f32,
}

impl SectionFrame {
    pub fn new(rig: &SectionRig, viewport: Vec2) -> Option<Self> {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return None;
        }
        let camera = rig.transform();
        let toward_camera = rig.side.direction() * (SECTION_CAMERA_DISTANCE / 2.0);
        Some(Self {
            origin: Vec3::new(rig.target.x, 0.0, rig.target.z) + toward_camera,
            left: *camera.left(),
            rotation: camera.rotation,
            half_width: rig.height * viewport.x / viewport.y / 2.0,
            scale: rig.height * HANDLE_SCALE,
        })
    }

    /// Handle centre at `height`, inset from the left edge of the view.
    pub fn handle_translation(&self, height: f32) -> Vec3 {
        self.origin + Vec3::Y * height + self.left * (self.half_width - self.scale * HANDLE_PADDING)
    }

    /// Centre of the level line at `height`.
    pub fn line_translation(&self, height: f32) -> Vec3 {
        self.origin + Vec3::Y * height
    }

    /// Half length of the level lines, overshooting the visible width.
    pub fn line_half_length(&self) -> f32 {
        self.half_width + LINE_OVERSHOOT * 2.0 * self.half_width
    }
}

fn level_line_mesh(half_length: f32, scale: f32) -> Mesh {
    let points = [Vec3::new(-half_length, 0.0, 0.0), Vec3::new(half_length, 0.0, 0.0)];
    line_list_mesh(&dashed_segments(&points, 30.0 * scale / 5.0, 20.0 * scale / 5.0))
}

pub fn spawn_section_handles(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let quad = meshes.add(Rectangle::new(1.0, 1.0));
    let line_material = materials.add(StandardMaterial {
        base_color: LINE_COLOR,
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });

    for handle in SectionHandle::ALL {
        commands.spawn((
            Name::new(format!("Section handle {:?}", handle)),
            handle,
            Mesh3d(quad.clone()),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: SectionGizmo::default().color(handle),
                unlit: true,
                double_sided: true,
                cull_mode: None,
                ..default()
            })),
            PickBounds::new(Vec3::new(1.0, 1.0, 0.1), Vec3::ZERO, PickKind::Gizmo),
            RenderLayers::layer(SECTION_GIZMO_LAYER),
            Transform::default(),
            Visibility::Hidden,
        ));

        if handle.has_level_line() {
            commands.spawn((
                Name::new(format!("Section level line {:?}", handle)),
                SectionLevelLine { handle, built_for: None },
                Mesh3d(meshes.add(level_line_mesh(1.0, 1.0))),
                MeshMaterial3d(line_material.clone()),
                RenderLayers::layer(SECTION_GIZMO_LAYER),
                Transform::default(),
                Visibility::Hidden,
            ));
        }

        commands.spawn((
            SectionHandleLabel(handle),
            Text::new(""),
            TextFont { font_size: 13.0, ..default() },
            TextColor(Color::WHITE),
            Node {
                position_type: PositionType::Absolute,
                display: Display::None,
                ..default()
            },
        ));
    }
}

/// Feeds the section-view pointer into the handle state machine. A double
/// click opens the numeric dialog instead of dragging.
pub fn section_gizmo_interaction(
    pointer: Res<PointerState>,
    settings: Res<ViewSettings>,
    store: Res<BuildingStore>,
    numeric_input: Res<NumericInputState>,
    time: Res<Time>,
    pickables: Pickables,
    handles: Query<&SectionHandle>,
    mut gizmo: ResMut<SectionGizmo>,
    mut updates: EventWriter<UpdateBuilding>,
    mut requests: EventWriter<NumericInputRequested>,
    mut last_sent: Local<Option<(BuildingId, BuildingPatch)>>,
) {
    let Some(building) = store.selected_building().copied() else {
        gizmo.set_if_neq(SectionGizmo::default());
        return;
    };
    if let SectionGizmoState::Dragging(drag) = gizmo.state {
        if drag.building != building.id {
            gizmo.state = SectionGizmoState::Idle;
        }
    }
    if numeric_input.is_open() {
        return;
    }

    let in_section = pointer.view == Some(ViewKind::Section);
    let hit = pointer
        .ray
        .filter(|_| in_section)
        .and_then(|ray| {
            pick(
                ray,
                &ViewKind::Section.camera_layers(&settings),
                pickables.iter(),
                |entity, _| {
                    handles.get(entity).is_ok_and(|handle| handle.applies_to(building.kind()))
                },
            )
        })
        .and_then(|hit| handles.get(hit.entity).ok().copied());
    let resting = hit.map_or(SectionGizmoState::Idle, SectionGizmoState::Hovering);

    match gizmo.state {
        SectionGizmoState::Dragging(drag) => {
            let edit = pointer.local.map(|local| drag.update(local.y));
            if let Some(patch) = edit {
                if *last_sent != Some((drag.building, patch)) {
                    updates.write(UpdateBuilding { id: drag.building, patch });
                    *last_sent = Some((drag.building, patch));
                }
            }
            if pointer.just_released {
                debug!("Section drag ended on {:?}", drag.handle);
                gizmo.state = resting;
            }
        }
        _ if pointer.just_pressed => {
            let (Some(handle), Some(local)) = (hit, pointer.local) else {
                gizmo.state = resting;
                return;
            };
            let now = time.elapsed_secs_f64();
            if gizmo.clicks.press(handle, now) {
                if let Some(request) = numeric_request(handle, &building) {
                    requests.write(request.into());
                }
                gizmo.state = resting;
            } else if let Some(drag) = SectionDrag::begin(handle, &building, local.y) {
                debug!("Section drag started on {:?} of {}", handle, building.id);
                *last_sent = None;
                gizmo.state = SectionGizmoState::Dragging(drag);
            }
        }
        _ => {
            if gizmo.state != resting {
                gizmo.state = resting;
            }
        }
    }
}

/// Turns confirmed dialog values into building edits.
pub fn apply_numeric_input(
    mut submitted: EventReader<NumericInputSubmitted>,
    store: Res<BuildingStore>,
    mut updates: EventWriter<UpdateBuilding>,
) {
    for NumericInputSubmitted { value, action } in submitted.read() {
        let NumericAction::Section(action) = action else {
            continue;
        };
        let Some(building) = store.get(action.building) else {
            warn!("Numeric edit for unknown {}", action.building);
            continue;
        };
        let patch = numeric_patch(action.kind, *value, building);
        if !patch.is_empty() {
            updates.write(UpdateBuilding { id: action.building, patch });
        }
    }
}

/// Places handles, level lines and labels at the selected building's
/// heights along the left edge of the section view.
pub fn layout_section_handles(
    store: Res<BuildingStore>,
    gizmo: Res<SectionGizmo>,
    layout: Res<ViewportLayout>,
    rigs: Query<&SectionRig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut handles: Query<(
        &SectionHandle,
        &mut Transform,
        &mut Visibility,
        &MeshMaterial3d<StandardMaterial>,
    )>,
    mut lines: Query<
        (&mut SectionLevelLine, &Mesh3d, &mut Transform, &mut Visibility),
        Without<SectionHandle>,
    >,
    mut labels: Query<(&SectionHandleLabel, &mut Node, &mut Text)>,
) {
    let viewport = layout.section.size();
    let frame = rigs.single().ok().and_then(|rig| SectionFrame::new(rig, viewport).map(|f| (rig, f)));
    let selected = store.selected_building();
    let height_of = |handle: SectionHandle| selected.and_then(|b| handle.height(b));

    for (handle, mut transform, mut visibility, material) in &mut handles {
        let placed = frame.zip(height_of(*handle));
        let Some(((_, frame), height)) = placed else {
            visibility.set_if_neq(Visibility::Hidden);
            continue;
        };
        visibility.set_if_neq(Visibility::Inherited);
        transform.set_if_neq(Transform {
            translation: frame.handle_translation(height),
            rotation: frame.rotation,
            scale: Vec3::splat(frame.scale),
        });

        let color = gizmo.color(*handle);
        if materials.get(&material.0).is_some_and(|m| m.base_color != color) {
            if let Some(mat) = materials.get_mut(&material.0) {
                mat.base_color = color;
            }
        }
    }

    for (mut line, mesh, mut transform, mut visibility) in &mut lines {
        let Some(((_, frame), height)) = frame.zip(height_of(line.handle)) else {
            visibility.set_if_neq(Visibility::Hidden);
            continue;
        };
        visibility.set_if_neq(Visibility::Inherited);
        transform.set_if_neq(
            Transform::from_translation(frame.line_translation(height)).with_rotation(frame.rotation),
        );

        let key = (frame.line_half_length(), frame.scale);
        if line.built_for != Some(key) {
            if let Some(existing) = meshes.get_mut(&mesh.0) {
                *existing = level_line_mesh(key.0, key.1);
            }
            line.built_for = Some(key);
        }
    }

    for (label, mut node, mut text) in &mut labels {
        let screen = frame.zip(selected).and_then(|((rig, frame), building)| {
            let height = label.0.height(building)?;
            let world = frame.handle_translation(height);
            let local = world_to_viewport(world, viewport, &rig.projection(), &rig.transform())?;
            Some((local, label.0.label(building)?))
        });
        let Some((local, value)) = screen else {
            if node.display != Display::None {
                node.display = Display::None;
            }
            continue;
        };

        let handle_px = frame.map_or(0.0, |(_, f)| f.scale / (2.0 * f.half_width) * viewport.x);
        let left = Val::Px(layout.section.min.x + local.x + handle_px);
        let top = Val::Px(layout.section.min.y + local.y - 8.0);
        if node.display != Display::Flex || node.left != left || node.top != top {
            node.display = Display::Flex;
            node.left = left;
            node.top = top;
        }
        if text.0 != value {
            text.0 = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::building::model::fixtures::gable;

    const EPS: f32 = 1e-3;
    const PX_EPS: f32 = 1e-2;

    #[test]
    fn handles_sit_inside_left_edge_at_their_height() {
        let rig = SectionRig::default();
        let viewport = Vec2::new(400.0, 250.0);
        let frame = SectionFrame::new(&rig, viewport).unwrap();
        assert!((frame.scale - rig.height * HANDLE_SCALE).abs() < EPS);

        let building = gable(4.0, 6.0, 3.0, 45.0);
        let height = SectionHandle::Ridge.height(&building).unwrap();
        let screen = world_to_viewport(
            frame.handle_translation(height),
            viewport,
            &rig.projection(),
            &rig.transform(),
        )
        .unwrap();

        let px_per_metre = viewport.y / rig.height;
        assert!((screen.x - frame.scale * HANDLE_PADDING * px_per_metre).abs() < PX_EPS);
        // Target at ground level sits at origin_y from the bottom.
        let ground_y = viewport.y * (1.0 - rig.origin_y);
        assert!((screen.y - (ground_y - height * px_per_metre)).abs() < PX_EPS);
    }

    #[test]
    fn level_lines_overshoot_visible_width() {
        let rig = SectionRig::default();
        let frame = SectionFrame::new(&rig, Vec2::new(400.0, 250.0)).unwrap();
        assert!(frame.line_half_length() > frame.half_width);
        assert!(SectionFrame::new(&rig, Vec2::ZERO).is_none());
    }

    #[test]
    fn confirmed_dialog_value_becomes_an_update() {
        use crate::tools::building::model::BuildingParams;
        use crate::tools::gizmo::section::{SectionEdit, SectionEditKind};

        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<BuildingStore>()
            .add_event::<NumericInputSubmitted>()
            .add_event::<UpdateBuilding>()
            .add_systems(Update, apply_numeric_input);

        let params: BuildingParams = gable(4.0, 6.0, 3.0, 30.0).params();
        let id = app.world_mut().resource_mut::<BuildingStore>().insert_new(params);
        app.world_mut().send_event(NumericInputSubmitted {
            value: 45.0,
            action: NumericAction::Section(SectionEdit { building: id, kind: SectionEditKind::Slope }),
        });
        app.update();

        let events = app.world().resource::<Events<UpdateBuilding>>();
        let updates: Vec<_> = events.iter_current_update_events().collect();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].id, id);
        assert_eq!(updates[0].patch.slope, Some(45.0));
    }
}
