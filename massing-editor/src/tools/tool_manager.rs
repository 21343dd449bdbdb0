use bevy::prelude::*;
use constants::building::ROOF_TRANSPARENCY_STEP;

use crate::engine::presentation::policy::ViewSettings;
use crate::engine::scene::ground::CycleMapEvent;
use crate::tools::building::model::RoofKind;
use crate::tools::building::store::DeleteSelectedBuilding;
use crate::tools::ui::numeric_input::NumericInputState;

/// What a primary click on the ground does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InteractionMode {
    #[default]
    Select,
    PlaceFlat,
    PlaceGable,
}

impl InteractionMode {
    /// Name shown on the toolbar and in the status line.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Select => "Select",
            Self::PlaceFlat => "Flat roof",
            Self::PlaceGable => "Gable roof",
        }
    }

    /// Roof type placed by this mode, if it is a placement mode.
    pub fn placement_kind(&self) -> Option<RoofKind> {
        match self {
            Self::Select => None,
            Self::PlaceFlat => Some(RoofKind::Flat),
            Self::PlaceGable => Some(RoofKind::Gable),
        }
    }
}

/// Resource tracking the current interaction mode.
#[derive(Resource, Default)]
pub struct ToolManager {
    mode: InteractionMode,
}

impl ToolManager {
    /// Switch mode. Returns false when the mode was already active.
    pub fn activate_mode(&mut self, mode: InteractionMode) -> bool {
        if self.mode == mode {
            return false;
        }
        info!("Mode switched: {} -> {}", self.mode.label(), mode.label());
        self.mode = mode;
        true
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn is_mode_active(&self, mode: InteractionMode) -> bool {
        self.mode == mode
    }
}

/// Request to change the interaction mode.
#[derive(Event, Debug, Clone, Copy)]
pub struct ModeSelectionEvent {
    pub mode: InteractionMode,
    pub source: ModeSelectionSource,
}

/// Where a mode change came from, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeSelectionSource {
    Keyboard,
    Toolbar,
}

pub fn handle_mode_selection_events(
    mut events: EventReader<ModeSelectionEvent>,
    mut tool_manager: ResMut<ToolManager>,
) {
    for event in events.read() {
        if tool_manager.activate_mode(event.mode) {
            debug!("Mode change requested via {:?}", event.source);
        }
    }
}

/// Keyboard shortcuts for modes, deletion, view toggles and map cycling.
/// Ignored while the numeric input dialog has focus.
pub fn handle_editor_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    numeric_input: Res<NumericInputState>,
    mut settings: ResMut<ViewSettings>,
    mut mode_events: EventWriter<ModeSelectionEvent>,
    mut delete_events: EventWriter<DeleteSelectedBuilding>,
    mut map_events: EventWriter<CycleMapEvent>,
) {
    if numeric_input.is_open() {
        return;
    }

    let mode_keys = [
        (KeyCode::Digit1, InteractionMode::PlaceFlat),
        (KeyCode::Digit2, InteractionMode::PlaceGable),
        (KeyCode::Escape, InteractionMode::Select),
    ];
    for (key, mode) in mode_keys {
        if keyboard.just_pressed(key) {
            mode_events.write(ModeSelectionEvent {
                mode,
                source: ModeSelectionSource::Keyboard,
            });
        }
    }

    if keyboard.just_pressed(KeyCode::Delete) {
        delete_events.write(DeleteSelectedBuilding);
    }

    if keyboard.just_pressed(KeyCode::KeyG) {
        settings.show_3d_guides = !settings.show_3d_guides;
        info!("3D guides {}", if settings.show_3d_guides { "on" } else { "off" });
    }
    if keyboard.just_pressed(KeyCode::KeyH) {
        settings.show_3d_gizmos = !settings.show_3d_gizmos;
        info!("3D gizmos {}", if settings.show_3d_gizmos { "on" } else { "off" });
    }

    if keyboard.just_pressed(KeyCode::BracketLeft) {
        settings.step_roof_transparency(-ROOF_TRANSPARENCY_STEP);
    }
    if keyboard.just_pressed(KeyCode::BracketRight) {
        settings.step_roof_transparency(ROOF_TRANSPARENCY_STEP);
    }

    if keyboard.just_pressed(KeyCode::KeyM) {
        map_events.write(CycleMapEvent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toolbar_labels_are_distinct() {
        let labels = [InteractionMode::Select, InteractionMode::PlaceFlat, InteractionMode::PlaceGable]
            .map(|mode| mode.label());
        assert_eq!(labels, ["Select", "Flat roof", "Gable roof"]);
    }

    #[test]
    fn activating_current_mode_is_a_no_op() {
        let mut manager = ToolManager::default();
        assert!(!manager.activate_mode(InteractionMode::Select));
        assert!(manager.activate_mode(InteractionMode::PlaceFlat));
        assert!(manager.is_mode_active(InteractionMode::PlaceFlat));
        assert_eq!(manager.mode().placement_kind(), Some(RoofKind::Flat));
    }
}
