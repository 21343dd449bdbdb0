//! Height and slope handles shown in the section view.
//!
//! Vertical pointer movement becomes a height delta that each handle turns
//! into wall height or roof slope edits. Flat roofs get a single total height
//! handle; gables get ridge, slope and eave handles. All results are clamped
//! to the building limits.

use bevy::prelude::*;
use constants::building::{MAX_SLOPE_DEG, MIN_SLOPE_DEG, MIN_WALL_HEIGHT};
use constants::section_gizmo::{
    ACTIVE_COLOR, DOUBLE_CLICK_SECS, DRAG_SENSITIVITY, HANDLE_COLOR, HOVER_COLOR,
};

use crate::tools::building::geometry::{ridge_rise, slope_for_rise};
use crate::tools::building::model::{Building, BuildingId, BuildingPatch, Roof, RoofKind};

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionHandle {
    /// Flat roofs: top of the roof slab.
    TotalHeight,
    Ridge,
    /// Middle of the gable rise.
    Slope,
    Eave,
}

impl SectionHandle {
    pub const ALL: [SectionHandle; 4] = [Self::TotalHeight, Self::Ridge, Self::Slope, Self::Eave];

    pub fn applies_to(&self, kind: RoofKind) -> bool {
        match kind {
            RoofKind::Flat => *self == Self::TotalHeight,
            RoofKind::Gable => *self != Self::TotalHeight,
        }
    }

    /// Whether a dashed level line is drawn through the handle.
    pub fn has_level_line(&self) -> bool {
        *self != Self::Slope
    }

    /// World height of the handle, or `None` if it does not apply.
    pub fn height(&self, building: &Building) -> Option<f32> {
        match (self, building.roof) {
            (Self::TotalHeight, Roof::Flat { thickness, .. }) => {
                Some(building.wall_height + thickness)
            }
            (Self::Ridge, Roof::Gable { width, slope, .. }) => {
                Some(building.wall_height + ridge_rise(width, slope))
            }
            (Self::Slope, Roof::Gable { width, slope, .. }) => {
                Some(building.wall_height + ridge_rise(width, slope) / 2.0)
            }
            (Self::Eave, Roof::Gable { .. }) => Some(building.wall_height),
            _ => None,
        }
    }

    pub fn label(&self, building: &Building) -> Option<String> {
        let height = self.height(building)?;
        Some(match (self, building.roof) {
            (Self::Slope, Roof::Gable { slope, .. }) => format!("Slope: {:.1}°", slope),
            (Self::TotalHeight, _) => format!("Height: {:.2}", height),
            (Self::Ridge, _) => format!("Ridge: {:.2}", height),
            _ => format!("Eave: {:.2}", height),
        })
    }
}

/// Vertical drag in screen pixels to metres. Moving up is positive.
pub fn height_delta(start_y: f32, current_y: f32) -> f32 {
    (start_y - current_y) * DRAG_SENSITIVITY
}

fn clamp_slope(slope: f32) -> f32 {
    slope.clamp(MIN_SLOPE_DEG, MAX_SLOPE_DEG)
}

/// Slope that puts the ridge at `target_ridge` over a wall of `wall_height`.
pub fn slope_for_ridge(target_ridge: f32, wall_height: f32, half_width: f32) -> f32 {
    clamp_slope(slope_for_rise((target_ridge - wall_height).max(0.0), half_width))
}

/// Slope that puts the middle of the rise at `target_mid`.
pub fn slope_for_midpoint(target_mid: f32, wall_height: f32, half_width: f32) -> f32 {
    let rise = (2.0 * (target_mid - wall_height)).max(0.0);
    clamp_slope(slope_for_rise(rise, half_width))
}

/// Moves the eave to `candidate_wall` while the ridge stays at `ridge_height`.
///
/// When the resulting slope leaves its bounds the slope is clamped and the wall
/// is recomputed from the clamped slope, so the ridge stays put and the eave
/// lands where the slope allows. Returns `(wall_height, slope)`.
pub fn eave_edit(candidate_wall: f32, ridge_height: f32, half_width: f32) -> (f32, f32) {
    let rise = (ridge_height - candidate_wall).max(0.0);
    let slope = slope_for_rise(rise, half_width);
    let (wall, slope) = if slope < MIN_SLOPE_DEG || slope > MAX_SLOPE_DEG {
        let bound = clamp_slope(slope);
        (ridge_height - half_width * bound.to_radians().tan(), bound)
    } else {
        (candidate_wall, slope)
    };
    (wall.max(MIN_WALL_HEIGHT), slope)
}

/// Building parameters captured at pointer-down in the section view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionDrag {
    pub handle: SectionHandle,
    pub building: BuildingId,
    pub start_y: f32,
    pub init_wall: f32,
    pub init_rise: f32,
    pub half_width: f32,
}

impl SectionDrag {
    pub fn begin(handle: SectionHandle, building: &Building, screen_y: f32) -> Option<Self> {
        if !handle.applies_to(building.kind()) {
            return None;
        }
        let init_rise = match building.roof {
            Roof::Gable { width, slope, .. } => ridge_rise(width, slope),
            Roof::Flat { .. } => 0.0,
        };
        Some(Self {
            handle,
            building: building.id,
            start_y: screen_y,
            init_wall: building.wall_height,
            init_rise,
            half_width: building.roof.width() / 2.0,
        })
    }

    fn init_ridge(&self) -> f32 {
        self.init_wall + self.init_rise
    }

    pub fn update(&self, screen_y: f32) -> BuildingPatch {
        let delta = height_delta(self.start_y, screen_y);
        match self.handle {
            SectionHandle::TotalHeight => BuildingPatch {
                wall_height: Some((self.init_wall + delta).max(MIN_WALL_HEIGHT)),
                ..default()
            },
            SectionHandle::Ridge => BuildingPatch {
                slope: Some(slope_for_ridge(
                    self.init_ridge() + delta,
                    self.init_wall,
                    self.half_width,
                )),
                ..default()
            },
            SectionHandle::Slope => BuildingPatch {
                slope: Some(slope_for_midpoint(
                    self.init_wall + self.init_rise / 2.0 + delta,
                    self.init_wall,
                    self.half_width,
                )),
                ..default()
            },
            SectionHandle::Eave => {
                let (wall, slope) =
                    eave_edit(self.init_wall + delta, self.init_ridge(), self.half_width);
                BuildingPatch { wall_height: Some(wall), slope: Some(slope), ..default() }
            }
        }
    }
}

/// Value edited through the numeric input dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionEditKind {
    WallHeight,
    RidgeHeight,
    Slope,
    EaveHeight,
}

/// Pending numeric edit, carried through the dialog round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionEdit {
    pub building: BuildingId,
    pub kind: SectionEditKind,
}

/// Dialog contents for a double-clicked handle.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericRequestSpec {
    pub title: &'static str,
    pub initial: f32,
    pub min: f32,
    pub max: Option<f32>,
    pub edit: SectionEdit,
}

pub fn numeric_request(handle: SectionHandle, building: &Building) -> Option<NumericRequestSpec> {
    let edit = |kind| SectionEdit { building: building.id, kind };
    match (handle, building.roof) {
        (SectionHandle::TotalHeight, Roof::Flat { .. }) => Some(NumericRequestSpec {
            title: "Set Wall Height",
            initial: building.wall_height,
            min: MIN_WALL_HEIGHT,
            max: None,
            edit: edit(SectionEditKind::WallHeight),
        }),
        (SectionHandle::Ridge, Roof::Gable { width, slope, .. }) => Some(NumericRequestSpec {
            title: "Set Ridge Height",
            initial: building.wall_height + ridge_rise(width, slope),
            min: building.wall_height,
            max: None,
            edit: edit(SectionEditKind::RidgeHeight),
        }),
        (SectionHandle::Slope, Roof::Gable { slope, .. }) => Some(NumericRequestSpec {
            title: "Set Roof Slope",
            initial: slope,
            min: MIN_SLOPE_DEG,
            max: Some(MAX_SLOPE_DEG),
            edit: edit(SectionEditKind::Slope),
        }),
        (SectionHandle::Eave, Roof::Gable { .. }) => Some(NumericRequestSpec {
            title: "Set Eave Height",
            initial: building.wall_height,
            min: MIN_WALL_HEIGHT,
            max: None,
            edit: edit(SectionEditKind::EaveHeight),
        }),
        _ => None,
    }
}

/// Edit for a confirmed dialog value, derived from the building as it is now.
pub fn numeric_patch(kind: SectionEditKind, value: f32, building: &Building) -> BuildingPatch {
    let half_width = building.roof.width() / 2.0;
    match (kind, building.roof) {
        (SectionEditKind::WallHeight, _) => BuildingPatch { wall_height: Some(value), ..default() },
        (SectionEditKind::Slope, Roof::Gable { .. }) => {
            BuildingPatch { slope: Some(value), ..default() }
        }
        (SectionEditKind::RidgeHeight, Roof::Gable { .. }) => BuildingPatch {
            slope: Some(slope_for_ridge(value, building.wall_height, half_width)),
            ..default()
        },
        (SectionEditKind::EaveHeight, Roof::Gable { width, slope, .. }) => {
            let ridge = building.wall_height + ridge_rise(width, slope);
            let (wall, slope) = eave_edit(value, ridge, half_width);
            BuildingPatch { wall_height: Some(wall), slope: Some(slope), ..default() }
        }
        _ => BuildingPatch::default(),
    }
}

/// Two presses on the same handle within [`DOUBLE_CLICK_SECS`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DoubleClickTracker {
    last: Option<(SectionHandle, f64)>,
}

impl DoubleClickTracker {
    /// Records a press at `now` seconds. True when it completes a double click.
    pub fn press(&mut self, handle: SectionHandle, now: f64) -> bool {
        let double = matches!(
            self.last,
            Some((last, at)) if last == handle && now - at < DOUBLE_CLICK_SECS
        );
        self.last = if double { None } else { Some((handle, now)) };
        double
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SectionGizmoState {
    #[default]
    Idle,
    Hovering(SectionHandle),
    Dragging(SectionDrag),
}

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct SectionGizmo {
    pub state: SectionGizmoState,
    pub clicks: DoubleClickTracker,
}

impl SectionGizmo {
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, SectionGizmoState::Dragging(_))
    }

    pub fn color(&self, handle: SectionHandle) -> Color {
        match self.state {
            SectionGizmoState::Dragging(drag) if drag.handle == handle => ACTIVE_COLOR,
            SectionGizmoState::Hovering(hovered) if hovered == handle => HOVER_COLOR,
            _ => HANDLE_COLOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::building::geometry::ridge;
    use crate::tools::building::model::fixtures::{flat, gable};

    const EPS: f32 = 1e-4;

    /// Screen y that produces `delta` metres when starting from y = 500.
    fn y_for(delta: f32) -> f32 {
        500.0 - delta / DRAG_SENSITIVITY
    }

    #[test]
    fn flat_total_height_drag_moves_walls_only() {
        let building = flat(3.0, 3.0, 3.0);
        let drag = SectionDrag::begin(SectionHandle::TotalHeight, &building, 500.0).unwrap();
        let mut edited = building;
        drag.update(y_for(1.0)).apply(&mut edited);
        assert!((edited.wall_height - 4.0).abs() < EPS);
        assert_eq!(edited.roof, building.roof);

        let patch = drag.update(y_for(-50.0));
        assert_eq!(patch.wall_height, Some(MIN_WALL_HEIGHT));
    }

    #[test]
    fn gable_handles_do_not_apply_to_flat_roofs() {
        let building = flat(3.0, 3.0, 3.0);
        assert!(SectionDrag::begin(SectionHandle::Ridge, &building, 0.0).is_none());
        assert!(SectionHandle::Ridge.height(&building).is_none());
        assert!(numeric_request(SectionHandle::Eave, &building).is_none());
    }

    #[test]
    fn ridge_drag_reaches_target_height() {
        let building = gable(4.0, 6.0, 3.0, 30.0);
        let drag = SectionDrag::begin(SectionHandle::Ridge, &building, 500.0).unwrap();
        let mut edited = building;
        drag.update(y_for(0.5)).apply(&mut edited);
        let before = ridge(&building).unwrap().height;
        let after = ridge(&edited).unwrap().height;
        assert!((after - (before + 0.5)).abs() < 1e-3);
        assert_eq!(edited.wall_height, 3.0);
    }

    #[test]
    fn ridge_round_trip_over_targets() {
        let building = gable(6.0, 6.0, 3.0, 30.0);
        for target in [3.01_f32, 3.5, 5.0, 9.0, 20.0] {
            let mut edited = building;
            numeric_patch(SectionEditKind::RidgeHeight, target, &building).apply(&mut edited);
            let height = ridge(&edited).unwrap().height;
            assert!((height - target).abs() < 1e-3, "target {} got {}", target, height);
        }
    }

    #[test]
    fn ridge_below_eave_clamps_to_minimum_slope() {
        let building = gable(4.0, 6.0, 3.0, 30.0);
        let drag = SectionDrag::begin(SectionHandle::Ridge, &building, 500.0).unwrap();
        assert_eq!(drag.update(y_for(-10.0)).slope, Some(MIN_SLOPE_DEG));
    }

    #[test]
    fn slope_drag_moves_rise_midpoint() {
        let building = gable(4.0, 6.0, 3.0, 45.0);
        // Rise 2, midpoint at 4. Raising the midpoint by 1 doubles the rise.
        let drag = SectionDrag::begin(SectionHandle::Slope, &building, 500.0).unwrap();
        let slope = drag.update(y_for(1.0)).slope.unwrap();
        assert!((ridge_rise(4.0, slope) - 4.0).abs() < 1e-3);
    }

    #[test]
    fn eave_drag_keeps_ridge_fixed() {
        let building = gable(4.0, 6.0, 3.0, 30.0);
        let ridge_before = ridge(&building).unwrap().height;
        let drag = SectionDrag::begin(SectionHandle::Eave, &building, 500.0).unwrap();
        let mut edited = building;
        drag.update(y_for(-1.0)).apply(&mut edited);
        assert!((edited.wall_height - 2.0).abs() < EPS);
        assert!((ridge(&edited).unwrap().height - ridge_before).abs() < 1e-3);
    }

    #[test]
    fn eave_drag_past_max_slope_clamps_slope_and_recomputes_wall() {
        let building = gable(4.0, 6.0, 3.0, 30.0);
        let ridge_height = ridge(&building).unwrap().height;
        let drag = SectionDrag::begin(SectionHandle::Eave, &building, 500.0).unwrap();
        let patch = drag.update(y_for(-20_000.0));
        assert_eq!(patch.slope, Some(MAX_SLOPE_DEG));
        let expected = (ridge_height - 2.0 * MAX_SLOPE_DEG.to_radians().tan()).max(MIN_WALL_HEIGHT);
        assert!((patch.wall_height.unwrap() - expected).abs() < EPS);
    }

    #[test]
    fn eave_above_ridge_clamps_to_minimum_slope() {
        let (wall, slope) = eave_edit(10.0, 4.0, 2.0);
        assert_eq!(slope, MIN_SLOPE_DEG);
        assert!((wall - (4.0 - 2.0 * MIN_SLOPE_DEG.to_radians().tan())).abs() < EPS);
    }

    #[test]
    fn labels_and_heights() {
        let building = flat(3.0, 3.0, 3.0);
        assert_eq!(SectionHandle::TotalHeight.label(&building).as_deref(), Some("Height: 3.15"));

        let building = gable(4.0, 6.0, 3.0, 45.0);
        assert_eq!(SectionHandle::Ridge.label(&building).as_deref(), Some("Ridge: 5.00"));
        assert_eq!(SectionHandle::Slope.label(&building).as_deref(), Some("Slope: 45.0°"));
        assert_eq!(SectionHandle::Eave.label(&building).as_deref(), Some("Eave: 3.00"));
        assert!((SectionHandle::Slope.height(&building).unwrap() - 4.0).abs() < EPS);
    }

    #[test]
    fn numeric_requests_carry_bounds() {
        let building = gable(4.0, 6.0, 3.0, 30.0);
        let request = numeric_request(SectionHandle::Slope, &building).unwrap();
        assert_eq!(request.title, "Set Roof Slope");
        assert_eq!(request.max, Some(MAX_SLOPE_DEG));
        let request = numeric_request(SectionHandle::Ridge, &building).unwrap();
        assert_eq!(request.min, 3.0);
        assert_eq!(request.edit.kind, SectionEditKind::RidgeHeight);
    }

    #[test]
    fn double_click_needs_same_handle_within_window() {
        let mut clicks = DoubleClickTracker::default();
        assert!(!clicks.press(SectionHandle::Ridge, 1.0));
        assert!(clicks.press(SectionHandle::Ridge, 1.2));
        // A completed double click does not chain into a third press.
        assert!(!clicks.press(SectionHandle::Ridge, 1.3));
        assert!(!clicks.press(SectionHandle::Eave, 1.4));
        assert!(!clicks.press(SectionHandle::Eave, 1.8));
    }
}
