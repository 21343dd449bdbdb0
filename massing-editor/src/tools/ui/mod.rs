//! Native Bevy UI overlays: mode toolbar, status line, the properties panel
//! and the numeric input dialog opened from it and from the section handles.

/// Modal numeric entry with clamping and unit display.
pub mod numeric_input;

/// Selected building's parameters, each editable through the numeric dialog.
pub mod properties;

/// Mode toolbar and selection status line.
pub mod status;

use bevy::prelude::*;

use crate::engine::core::app_state::EditorSet;
use numeric_input::{
    NumericInputRequested, NumericInputState, NumericInputSubmitted, numeric_input_keyboard,
    open_numeric_input, reflect_numeric_input, spawn_numeric_input_ui,
};
use properties::{
    apply_property_input, property_button_interaction, reflect_properties, spawn_properties_panel,
};
use status::{
    highlight_active_mode, mode_button_interaction, spawn_status_ui, update_status_text,
};

// Registers the dialog state, its events and the overlay systems.
pub struct EditorUiPlugin;

impl Plugin for EditorUiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NumericInputState>()
            .add_event::<NumericInputRequested>()
            .add_event::<NumericInputSubmitted>()
            .add_systems(
                Startup,
                (spawn_status_ui, spawn_properties_panel, spawn_numeric_input_ui),
            )
            .add_systems(
                Update,
                (
                    (
                        mode_button_interaction,
                        property_button_interaction,
                        open_numeric_input,
                        numeric_input_keyboard,
                    )
                        .chain()
                        .in_set(EditorSet::Input),
                    apply_property_input.in_set(EditorSet::Gizmos),
                    (
                        update_status_text,
                        highlight_active_mode,
                        reflect_properties,
                        reflect_numeric_input,
                    )
                        .in_set(EditorSet::Present),
                ),
            );
    }
}
