//! Editing tools layered on the engine: interaction modes, buildings,
//! manipulation gizmos and the UI overlays.
//!
//! ## Mode Switching
//!
//! ```text
//! Keyboard (1, 2, Esc) / Toolbar buttons
//!   └─> ModeSelectionEvent
//!       └─> handle_mode_selection_events()
//!           └─> ToolManager (Select, PlaceFlat, PlaceGable)
//! ```
//!
//! Adding a building always returns the editor to `Select`.

/// Building model, geometry, store, ghost preview and mesh sync.
pub mod building;

/// Transform and section handles.
pub mod gizmo;

/// Interaction mode resource and editor keyboard shortcuts.
pub mod tool_manager;

/// Toolbar, status line and numeric input dialog.
pub mod ui;
