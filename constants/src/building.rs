/// Smallest value any derived building dimension may take.
pub const MIN_DIMENSION: f32 = 0.01;

/// Default roof width for newly placed buildings (metres).
pub const DEFAULT_WIDTH: f32 = 3.0;

/// Default roof length for newly placed buildings (metres).
pub const DEFAULT_LENGTH: f32 = 3.0;

/// Default roof overhang beyond the walls (metres).
pub const DEFAULT_EXTENSION: f32 = 0.15;

/// Default wall height (metres).
pub const DEFAULT_WALL_HEIGHT: f32 = 3.0;

/// Default yaw for newly placed buildings (radians).
pub const DEFAULT_ROTATION: f32 = 0.0;

/// Default flat roof slab thickness (metres).
pub const DEFAULT_FLAT_THICKNESS: f32 = 0.15;

/// Default gable roof pitch (degrees).
pub const DEFAULT_GABLE_SLOPE_DEG: f32 = 30.0;

pub const MIN_WALL_HEIGHT: f32 = 0.01;
pub const MIN_SLOPE_DEG: f32 = 0.01;
pub const MAX_SLOPE_DEG: f32 = 89.99;

/// Smallest footprint width or length a resize drag may produce.
pub const MIN_RESIZE_EXTENT: f32 = 1.0;

/// Initial plan-view roof opacity.
pub const DEFAULT_ROOF_TRANSPARENCY: f32 = 0.15;

/// Keyboard step applied to the roof opacity.
pub const ROOF_TRANSPARENCY_STEP: f32 = 0.05;
