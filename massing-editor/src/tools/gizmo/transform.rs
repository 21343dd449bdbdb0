//! Resize and rotate handles for the selected building.
//!
//! All drag math works in the building's local frame, relative to the
//! parameters captured when the drag started.

use bevy::prelude::*;
use constants::building::MIN_RESIZE_EXTENT;
use constants::gizmo::{
    ACTIVE_COLOR, CORNER_COLOR, HOVER_COLOR, ROTATE_COLOR, ROTATE_DISTANCE, X_AXIS_COLOR,
    Y_OFFSET, Z_AXIS_COLOR,
};

use crate::tools::building::model::{Building, BuildingId, BuildingPatch};

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformHandle {
    CornerNw,
    CornerNe,
    CornerSw,
    CornerSe,
    EdgeN,
    EdgeS,
    EdgeW,
    EdgeE,
    Rotate,
}

/// Which footprint bounds a resize handle moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct MovedBounds {
    west: bool,
    east: bool,
    north: bool,
    south: bool,
}

impl TransformHandle {
    pub const ALL: [TransformHandle; 9] = [
        Self::CornerNw,
        Self::CornerNe,
        Self::CornerSw,
        Self::CornerSe,
        Self::EdgeN,
        Self::EdgeS,
        Self::EdgeW,
        Self::EdgeE,
        Self::Rotate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::CornerNw => "corner-nw",
            Self::CornerNe => "corner-ne",
            Self::CornerSw => "corner-sw",
            Self::CornerSe => "corner-se",
            Self::EdgeN => "edge-n",
            Self::EdgeS => "edge-s",
            Self::EdgeW => "edge-w",
            Self::EdgeE => "edge-e",
            Self::Rotate => "rotate",
        }
    }

    pub fn base_color(&self) -> Color {
        match self {
            Self::EdgeE | Self::EdgeW => X_AXIS_COLOR,
            Self::EdgeN | Self::EdgeS => Z_AXIS_COLOR,
            Self::Rotate => ROTATE_COLOR,
            _ => CORNER_COLOR,
        }
    }

    /// Offset on the ground plane (x, z) in the unrotated building frame.
    pub fn local_offset(&self, half_width: f32, half_length: f32) -> Vec2 {
        let (hw, hl) = (half_width, half_length);
        match self {
            Self::CornerNw => Vec2::new(-hw, -hl),
            Self::CornerNe => Vec2::new(hw, -hl),
            Self::CornerSw => Vec2::new(-hw, hl),
            Self::CornerSe => Vec2::new(hw, hl),
            Self::EdgeN => Vec2::new(0.0, -hl),
            Self::EdgeS => Vec2::new(0.0, hl),
            Self::EdgeW => Vec2::new(-hw, 0.0),
            Self::EdgeE => Vec2::new(hw, 0.0),
            Self::Rotate => Vec2::new(0.0, -hl - ROTATE_DISTANCE),
        }
    }

    fn moved_bounds(&self) -> MovedBounds {
        let none = MovedBounds::default();
        match self {
            Self::CornerNw => MovedBounds { west: true, north: true, ..none },
            Self::CornerNe => MovedBounds { east: true, north: true, ..none },
            Self::CornerSw => MovedBounds { west: true, south: true, ..none },
            Self::CornerSe => MovedBounds { east: true, south: true, ..none },
            Self::EdgeN => MovedBounds { north: true, ..none },
            Self::EdgeS => MovedBounds { south: true, ..none },
            Self::EdgeW => MovedBounds { west: true, ..none },
            Self::EdgeE => MovedBounds { east: true, ..none },
            Self::Rotate => none,
        }
    }
}

fn yaw(angle: f32) -> Quat {
    Quat::from_rotation_y(angle)
}

/// Handle offset from the building anchor, rotated into world space.
fn rotated_offset(handle: TransformHandle, building: &Building) -> Vec3 {
    let local = handle.local_offset(building.roof.width() / 2.0, building.roof.length() / 2.0);
    yaw(building.rotation) * Vec3::new(local.x, 0.0, local.y)
}

/// World position of a handle of `building`.
pub fn handle_position(handle: TransformHandle, building: &Building) -> Vec3 {
    building.position
        + rotated_offset(handle, building)
        + Vec3::Y * (building.wall_height + Y_OFFSET)
}

/// Parameters captured at pointer-down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub handle: TransformHandle,
    pub building: BuildingId,
    pub start_ground: Vec3,
    pub init_position: Vec3,
    pub init_rotation: f32,
    pub init_width: f32,
    pub init_length: f32,
    /// Handle ground offset from the building anchor at drag start, world frame.
    pub start_offset: Vec3,
}

impl DragSession {
    pub fn begin(handle: TransformHandle, building: &Building, ground: Vec3) -> Self {
        Self {
            handle,
            building: building.id,
            start_ground: ground,
            init_position: building.position,
            init_rotation: building.rotation,
            init_width: building.roof.width(),
            init_length: building.roof.length(),
            start_offset: rotated_offset(handle, building),
        }
    }

    /// Parameter update for the pointer at `ground`.
    pub fn update(&self, ground: Vec3) -> BuildingPatch {
        match self.handle {
            TransformHandle::Rotate => self.rotate(ground),
            _ => self.resize(ground),
        }
    }

    fn resize(&self, ground: Vec3) -> BuildingPatch {
        let delta = ground - self.start_ground;
        let offset = self.start_offset + Vec3::new(delta.x, 0.0, delta.z);
        let local = yaw(-self.init_rotation) * offset;

        let (hw, hl) = (self.init_width / 2.0, self.init_length / 2.0);
        let (mut min_x, mut max_x, mut min_z, mut max_z) = (-hw, hw, -hl, hl);
        let moved = self.handle.moved_bounds();
        if moved.east {
            max_x = local.x.max(min_x + MIN_RESIZE_EXTENT);
        }
        if moved.west {
            min_x = local.x.min(max_x - MIN_RESIZE_EXTENT);
        }
        if moved.south {
            max_z = local.z.max(min_z + MIN_RESIZE_EXTENT);
        }
        if moved.north {
            min_z = local.z.min(max_z - MIN_RESIZE_EXTENT);
        }

        let mid = Vec3::new((min_x + max_x) / 2.0, 0.0, (min_z + max_z) / 2.0);
        BuildingPatch {
            position: Some(self.init_position + yaw(self.init_rotation) * mid),
            width: Some(max_x - min_x),
            length: Some(max_z - min_z),
            ..default()
        }
    }

    fn rotate(&self, ground: Vec3) -> BuildingPatch {
        let p = self.init_position;
        let s = self.start_ground;
        let now = (ground.x - p.x).atan2(ground.z - p.z);
        let start = (s.x - p.x).atan2(s.z - p.z);
        BuildingPatch { rotation: Some(self.init_rotation + now - start), ..default() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GizmoState {
    #[default]
    Idle,
    Hovering(TransformHandle),
    Dragging(DragSession),
}

/// Interaction state of the transform gizmo.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default)]
pub struct TransformGizmo {
    pub state: GizmoState,
}

impl TransformGizmo {
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GizmoState::Dragging(_))
    }

    /// Pointer moved. `hit` is the handle under the pointer, if any.
    /// Returns the edit to apply while dragging.
    pub fn pointer_move(
        &mut self,
        hit: Option<TransformHandle>,
        ground: Option<Vec3>,
    ) -> Option<(BuildingId, BuildingPatch)> {
        match self.state {
            GizmoState::Dragging(session) => {
                ground.map(|ground| (session.building, session.update(ground)))
            }
            _ => {
                self.state = hit.map_or(GizmoState::Idle, GizmoState::Hovering);
                None
            }
        }
    }

    /// Primary press. Returns true when a handle took the press.
    /// Without a ground point the drag is anchored at the building position.
    pub fn pointer_down(
        &mut self,
        hit: Option<TransformHandle>,
        ground: Option<Vec3>,
        building: &Building,
    ) -> bool {
        let Some(handle) = hit else {
            return false;
        };
        let ground = ground.unwrap_or(building.position);
        self.state = GizmoState::Dragging(DragSession::begin(handle, building, ground));
        debug!("Transform drag started on {} of {}", handle.label(), building.id);
        true
    }

    /// Primary release, or the pointer leaving the window.
    pub fn pointer_up(&mut self, hit: Option<TransformHandle>) {
        if let GizmoState::Dragging(session) = self.state {
            debug!("Transform drag ended on {}", session.handle.label());
        }
        self.state = hit.map_or(GizmoState::Idle, GizmoState::Hovering);
    }

    pub fn cancel(&mut self) {
        self.state = GizmoState::Idle;
    }

    pub fn color(&self, handle: TransformHandle) -> Color {
        match self.state {
            GizmoState::Dragging(session) if session.handle == handle => ACTIVE_COLOR,
            GizmoState::Hovering(hovered) if hovered == handle => HOVER_COLOR,
            _ => handle.base_color(),
        }
    }
}
