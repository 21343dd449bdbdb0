use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::ray::{ground_hit, pointer_ray};
use crate::engine::camera::viewports::{EditorCamera, ViewKind, ViewportLayout};

/// Primary-button pointer resolved against the viewport it belongs to.
///
/// A press captures the viewport under the cursor; until release, the ray and
/// ground point keep coming from that viewport's camera even when the cursor
/// crosses into another one. The cursor leaving the window counts as a release.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct PointerState {
    /// Viewport the pointer is interacting with: the captured one, or the one hovered.
    pub view: Option<ViewKind>,
    /// Cursor relative to that viewport's top-left corner, logical pixels.
    pub local: Option<Vec2>,
    pub ray: Option<Ray3d>,
    pub ground: Option<Vec3>,
    pub captured: Option<ViewKind>,
    pub just_pressed: bool,
    pub just_released: bool,
}

pub fn update_pointer_state(
    windows: Query<&Window, With<PrimaryWindow>>,
    buttons: Res<ButtonInput<MouseButton>>,
    layout: Res<ViewportLayout>,
    cameras: Query<(&EditorCamera, &Projection, &Transform)>,
    ui: Query<&Interaction>,
    mut pointer: ResMut<PointerState>,
) {
    let cursor = windows.single().ok().and_then(|window| window.cursor_position());
    let hovered = cursor.and_then(|cursor| layout.locate(cursor)).map(|(view, _)| view);

    pointer.just_pressed = false;
    pointer.just_released = false;

    if let Some(view) = pointer.captured {
        if buttons.just_released(MouseButton::Left) || cursor.is_none() {
            pointer.just_released = true;
            pointer.captured = None;
            debug!("Pointer released from {} view", view.label());
        }
    } else if buttons.just_pressed(MouseButton::Left) {
        // Presses on toolbar buttons never reach the viewports.
        let over_ui = ui.iter().any(|interaction| *interaction != Interaction::None);
        if let Some(view) = hovered.filter(|_| !over_ui) {
            pointer.just_pressed = true;
            pointer.captured = Some(view);
        }
    }

    // A release keeps the last position for this frame so drags can finish.
    let view = match (pointer.captured, hovered) {
        (Some(view), _) => Some(view),
        (None, _) if pointer.just_released => pointer.view,
        (None, hovered) => hovered,
    };
    let Some((view, cursor)) = view.zip(cursor) else {
        if !pointer.just_released {
            pointer.view = None;
            pointer.local = None;
            pointer.ray = None;
            pointer.ground = None;
        }
        return;
    };

    let local = layout.local(view, cursor);
    let size = layout.rect(view).size();
    let ray = cameras
        .iter()
        .find(|(camera, _, _)| camera.view == view)
        .and_then(|(_, projection, transform)| pointer_ray(local, size, projection, transform));

    pointer.view = Some(view);
    pointer.local = Some(local);
    pointer.ray = ray;
    pointer.ground = ray.and_then(ground_hit);
}
