use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use constants::camera::{
    ORBIT_SENSITIVITY, PERSPECTIVE_INITIAL_RADIUS, PERSPECTIVE_MAX_BETA, PERSPECTIVE_MAX_RADIUS,
    PERSPECTIVE_MIN_BETA, PERSPECTIVE_MIN_RADIUS, PERSPECTIVE_PAN_SENSITIVITY, PLAN_MAX_WIDTH,
    PLAN_MIN_WIDTH, SECTION_FIT_PADDING, SECTION_MAX_HEIGHT, SECTION_MIN_HEIGHT, ZOOM_FACTOR,
};

use super::viewports::{OrbitRig, PlanRig, SectionRig, ViewKind, ViewportLayout};
use crate::tools::building::geometry::display_values;
use crate::tools::building::model::BuildingId;
use crate::tools::building::store::BuildingStore;
use crate::tools::ui::numeric_input::NumericInputState;

/// Camera drag in progress: which view it started in and with which button.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct CameraDrag {
    pub active: Option<(ViewKind, MouseButton)>,
}

/// View under the cursor, if any.
fn hovered_view(
    windows: &Query<&Window, With<PrimaryWindow>>,
    layout: &ViewportLayout,
) -> Option<(ViewKind, Vec2)> {
    let window = windows.single().ok()?;
    layout.locate(window.cursor_position()?)
}

/// Sum of wheel movement in line steps. Positive scrolls away from the user.
pub fn wheel_steps<'a>(events: impl IntoIterator<Item = &'a MouseWheel>) -> f32 {
    events
        .into_iter()
        .map(|event| match event.unit {
            MouseScrollUnit::Line => event.y,
            MouseScrollUnit::Pixel => event.y * 0.05,
        })
        .sum()
}

fn zoom_scale(steps: f32) -> f32 {
    ZOOM_FACTOR.powf(-steps)
}

impl PlanRig {
    /// Zooms keeping the ground point under `local` fixed on screen.
    pub fn zoom_about(&mut self, local: Vec2, viewport_size: Vec2, steps: f32) {
        if viewport_size.x <= 0.0 {
            return;
        }
        let width = (self.width * zoom_scale(steps)).clamp(PLAN_MIN_WIDTH, PLAN_MAX_WIDTH);
        let metres_per_px = self.width / viewport_size.x;
        let offset = (local - viewport_size / 2.0) * metres_per_px;
        let cursor_world = self.target + Vec3::new(offset.x, 0.0, offset.y);
        self.target = cursor_world - (cursor_world - self.target) * (width / self.width);
        self.width = width;
    }

    pub fn pan(&mut self, delta_px: Vec2, viewport_width: f32) {
        if viewport_width <= 0.0 {
            return;
        }
        let metres_per_px = self.width / viewport_width;
        self.target -= Vec3::new(delta_px.x, 0.0, delta_px.y) * metres_per_px;
    }
}

impl OrbitRig {
    pub fn orbit(&mut self, delta_px: Vec2) {
        self.alpha -= delta_px.x * ORBIT_SENSITIVITY;
        self.beta = (self.beta - delta_px.y * ORBIT_SENSITIVITY)
            .clamp(PERSPECTIVE_MIN_BETA, PERSPECTIVE_MAX_BETA);
    }

    pub fn zoom(&mut self, steps: f32) {
        self.radius = (self.radius * zoom_scale(steps))
            .clamp(PERSPECTIVE_MIN_RADIUS, PERSPECTIVE_MAX_RADIUS);
    }

    /// Moves the target across the ground, in screen-aligned directions.
    pub fn pan(&mut self, delta_px: Vec2) {
        let (sin_a, cos_a) = self.alpha.sin_cos();
        let forward = Vec3::new(-cos_a, 0.0, sin_a);
        let right = Vec3::new(-sin_a, 0.0, -cos_a);
        let speed = PERSPECTIVE_PAN_SENSITIVITY * self.radius / PERSPECTIVE_INITIAL_RADIUS;
        self.target += (-right * delta_px.x + forward * delta_px.y) * speed;
    }
}

impl SectionRig {
    pub fn zoom(&mut self, steps: f32) {
        self.height =
            (self.height * zoom_scale(steps)).clamp(SECTION_MIN_HEIGHT, SECTION_MAX_HEIGHT);
    }

    /// Frames a building of the given total height, centred on the target.
    pub fn fit(&mut self, total_height: f32) {
        let half = (total_height * SECTION_FIT_PADDING / 2.0)
            .clamp(SECTION_MIN_HEIGHT / 2.0, SECTION_MAX_HEIGHT / 2.0);
        self.height = half * 2.0;
        self.origin_y = 0.5;
    }
}

/// Starts and ends camera drags for the middle and right buttons.
pub fn track_camera_drag(
    windows: Query<&Window, With<PrimaryWindow>>,
    layout: Res<ViewportLayout>,
    buttons: Res<ButtonInput<MouseButton>>,
    mut drag: ResMut<CameraDrag>,
) {
    if let Some((_, button)) = drag.active {
        if !buttons.pressed(button) {
            drag.active = None;
        }
        return;
    }
    for button in [MouseButton::Middle, MouseButton::Right] {
        if buttons.just_pressed(button) {
            if let Some((view, _)) = hovered_view(&windows, &layout) {
                drag.active = Some((view, button));
                return;
            }
        }
    }
}

pub fn plan_camera_controls(
    windows: Query<&Window, With<PrimaryWindow>>,
    layout: Res<ViewportLayout>,
    drag: Res<CameraDrag>,
    mut wheel: EventReader<MouseWheel>,
    mut motion: EventReader<MouseMotion>,
    mut rigs: Query<&mut PlanRig>,
) {
    let steps = wheel_steps(wheel.read());
    let delta: Vec2 = motion.read().map(|m| m.delta).sum();
    let Ok(mut rig) = rigs.single_mut() else {
        return;
    };
    let size = layout.plan.size();

    if steps.abs() > f32::EPSILON {
        if let Some((ViewKind::Plan, local)) = hovered_view(&windows, &layout) {
            rig.zoom_about(local, size, steps);
        }
    }
    if drag.active == Some((ViewKind::Plan, MouseButton::Middle)) && delta != Vec2::ZERO {
        rig.pan(delta, size.x);
    }
}

pub fn perspective_camera_controls(
    windows: Query<&Window, With<PrimaryWindow>>,
    layout: Res<ViewportLayout>,
    drag: Res<CameraDrag>,
    mut wheel: EventReader<MouseWheel>,
    mut motion: EventReader<MouseMotion>,
    mut rigs: Query<&mut OrbitRig>,
) {
    let steps = wheel_steps(wheel.read());
    let delta: Vec2 = motion.read().map(|m| m.delta).sum();
    let Ok(mut rig) = rigs.single_mut() else {
        return;
    };

    if steps.abs() > f32::EPSILON {
        if let Some((ViewKind::Perspective, _)) = hovered_view(&windows, &layout) {
            rig.zoom(steps);
        }
    }
    if delta == Vec2::ZERO {
        return;
    }
    match drag.active {
        Some((ViewKind::Perspective, MouseButton::Right)) => rig.orbit(delta),
        Some((ViewKind::Perspective, MouseButton::Middle)) => rig.pan(delta),
        _ => {}
    }
}

pub fn section_camera_controls(
    windows: Query<&Window, With<PrimaryWindow>>,
    layout: Res<ViewportLayout>,
    keyboard: Res<ButtonInput<KeyCode>>,
    numeric_input: Res<NumericInputState>,
    mut wheel: EventReader<MouseWheel>,
    mut rigs: Query<&mut SectionRig>,
) {
    let steps = wheel_steps(wheel.read());
    let Ok(mut rig) = rigs.single_mut() else {
        return;
    };

    if steps.abs() > f32::EPSILON {
        if let Some((ViewKind::Section, _)) = hovered_view(&windows, &layout) {
            rig.zoom(steps);
        }
    }

    if numeric_input.is_open() {
        return;
    }
    if keyboard.just_pressed(KeyCode::KeyQ) {
        rig.side = rig.side.previous();
        info!("Section view side: {:?}", rig.side);
    }
    if keyboard.just_pressed(KeyCode::KeyE) {
        rig.side = rig.side.next();
        info!("Section view side: {:?}", rig.side);
    }
}

/// Keeps the section camera on the selected building and refits it when the
/// selection changes.
pub fn track_section_target(
    store: Res<BuildingStore>,
    mut rigs: Query<&mut SectionRig>,
    mut last_selected: Local<Option<BuildingId>>,
) {
    let Ok(mut rig) = rigs.single_mut() else {
        return;
    };
    let selected = store.selected();
    let selection_changed = *last_selected != selected;
    *last_selected = selected;

    let Some(building) = store.selected_building() else {
        return;
    };
    let mut next = *rig;
    next.target = Vec3::new(building.position.x, building.wall_height / 2.0, building.position.z);
    if selection_changed {
        next.fit(display_values(building).total_height);
    }
    rig.set_if_neq(next);
}
