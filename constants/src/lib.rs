//! Shared tuning constants for the massing editor.
//!
//! Grouped by the part of the editor that consumes them so that geometry,
//! gizmo and camera code never hard-code a number inline.

/// Building defaults and editing limits.
pub mod building;

/// Camera projection limits, initial orbit angles and viewport split.
pub mod camera;

/// Transform gizmo handle sizes and colours.
pub mod gizmo;

/// Guide offsets, ghost parking height, ground scale and render layers.
pub mod interaction;

/// Surface and guide line colours.
pub mod materials;

/// Section (elevation) gizmo sizes, colours and drag tuning.
pub mod section_gizmo;
