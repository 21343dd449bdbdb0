use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, PI};

/// Fraction of the window width given to the plan viewport.
pub const PLAN_VIEW_WIDTH_FRACTION: f32 = 0.6;

/// Initial visible plan width (metres).
pub const PLAN_INITIAL_WIDTH: f32 = 40.0;
pub const PLAN_MIN_WIDTH: f32 = 2.0;
pub const PLAN_MAX_WIDTH: f32 = 200.0;

/// Height of the plan camera above the ground.
pub const PLAN_CAMERA_HEIGHT: f32 = 100.0;

/// Multiplicative zoom step shared by all three viewports.
pub const ZOOM_FACTOR: f32 = 1.1;

/// Far clip plane for the orthographic cameras.
pub const ORTHO_FAR: f32 = 10_000.0;

pub const PERSPECTIVE_INITIAL_ALPHA: f32 = -FRAC_PI_2;
pub const PERSPECTIVE_INITIAL_BETA: f32 = FRAC_PI_3;
pub const PERSPECTIVE_INITIAL_RADIUS: f32 = 60.0;
pub const PERSPECTIVE_MIN_RADIUS: f32 = 5.0;
pub const PERSPECTIVE_MAX_RADIUS: f32 = 200.0;
pub const PERSPECTIVE_MIN_BETA: f32 = 0.1;
pub const PERSPECTIVE_MAX_BETA: f32 = PI - 0.1;

/// Orbit speed in radians per pixel of mouse motion.
pub const ORBIT_SENSITIVITY: f32 = 0.003;

/// Perspective pan speed in metres per pixel at unit radius.
pub const PERSPECTIVE_PAN_SENSITIVITY: f32 = 0.05;

/// Distance between the section camera and its target.
pub const SECTION_CAMERA_DISTANCE: f32 = 60.0;

/// Initial section view spans 20 m above and 5 m below the target.
pub const SECTION_INITIAL_TOP: f32 = 20.0;
pub const SECTION_INITIAL_BOTTOM: f32 = -5.0;
pub const SECTION_MIN_HEIGHT: f32 = 5.0;
pub const SECTION_MAX_HEIGHT: f32 = 100.0;

/// Auto-fit pads the building's total height by this factor.
pub const SECTION_FIT_PADDING: f32 = 1.5;

/// Orbit angles for each elevation side.
pub const SECTION_SIDE_NE: f32 = -FRAC_PI_2;
pub const SECTION_SIDE_SE: f32 = -PI;
pub const SECTION_SIDE_SW: f32 = FRAC_PI_2;
pub const SECTION_SIDE_NW: f32 = 0.0;
