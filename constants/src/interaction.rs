/// Y position used to park the ghost building out of sight.
pub const GHOST_HIDDEN_Y: f32 = -100.0;

/// Background image pixels per world unit.
pub const PIXELS_PER_UNIT: f32 = 100.0;

/// Ground plane edge length when no image is available.
pub const FALLBACK_GROUND_SIZE: f32 = 50.0;

/// Wall footprint guide elevation (avoids z-fighting with the ground).
pub const FOOTPRINT_GUIDE_OFFSET: f32 = 0.02;

/// Roof overhang guide elevation.
pub const EXTENSION_GUIDE_OFFSET: f32 = 0.1;

/// Ridge guide clearance above the roof apex.
pub const RIDGE_GUIDE_OFFSET: f32 = 0.05;

/// Rays closer than this to horizontal never hit the ground.
pub const GROUND_PARALLEL_EPSILON: f32 = 0.001;

/// Render layer seen only by the plan camera.
pub const PLAN_LAYER: usize = 1;

/// Render layer seen only by the perspective camera.
pub const PERSPECTIVE_LAYER: usize = 2;

/// Render layer seen only by the section camera.
pub const SECTION_LAYER: usize = 3;

/// Transform gizmo handles (plan, optionally perspective).
pub const TRANSFORM_GIZMO_LAYER: usize = 4;

/// Section gizmo handles (section only).
pub const SECTION_GIZMO_LAYER: usize = 5;
