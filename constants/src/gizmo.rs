use bevy::color::Color;

/// Edge length of the corner resize cubes.
pub const CORNER_SIZE: f32 = 0.2;

/// Length of the edge resize bars.
pub const BAR_LENGTH: f32 = 0.6;

/// Thickness of the edge resize bars.
pub const BAR_THICKNESS: f32 = 0.1;

pub const ROTATE_PUCK_DIAMETER: f32 = 0.6;
pub const ROTATE_PUCK_HEIGHT: f32 = 0.1;

/// Handles float this far above the wall top.
pub const Y_OFFSET: f32 = 0.2;

/// Rotate handle distance beyond the north roof edge.
pub const ROTATE_DISTANCE: f32 = 0.5;

/// #E74C3C
pub const X_AXIS_COLOR: Color = Color::srgb(0.906, 0.298, 0.235);
/// #3498DB
pub const Z_AXIS_COLOR: Color = Color::srgb(0.204, 0.596, 0.859);
/// #34495E
pub const CORNER_COLOR: Color = Color::srgb(0.204, 0.286, 0.369);
/// #F39C12
pub const ROTATE_COLOR: Color = Color::srgb(0.953, 0.612, 0.071);
pub const HOVER_COLOR: Color = Color::WHITE;
/// #2ECC71
pub const ACTIVE_COLOR: Color = Color::srgb(0.180, 0.800, 0.443);
