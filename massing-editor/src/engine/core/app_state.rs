use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States, Resource)]
pub enum AppState {
    /// Waiting for the editor config to load or fail.
    #[default]
    Loading,
    Running,
}

/// Per-frame editing pipeline, run in this order while `Running`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorSet {
    /// Keyboard shortcuts, toolbar, dialog input and camera controls.
    Input,
    /// Pointer capture, rays and ground point.
    Pointer,
    /// Gizmo state machines.
    Gizmos,
    /// Placement, selection and move drags.
    Selection,
    /// Parameter events applied to the store.
    Apply,
    /// Mesh sync and scene rebuilds.
    Sync,
    /// Handle and label placement.
    Layout,
    /// Per-view presentation.
    Present,
}

