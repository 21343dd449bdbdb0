use bevy::color::Color;

/// Handle quad size relative to the section view height.
pub const HANDLE_SCALE: f32 = 0.05;

/// Left padding of the handles, in handle sizes.
pub const HANDLE_PADDING: f32 = 1.0;

/// Level lines overshoot the visible width by this fraction.
pub const LINE_OVERSHOOT: f32 = 0.1;

/// #FF6B00
pub const HANDLE_COLOR: Color = Color::srgb(1.0, 0.42, 0.0);
pub const HOVER_COLOR: Color = Color::WHITE;
/// #2ECC71
pub const ACTIVE_COLOR: Color = Color::srgb(0.180, 0.800, 0.443);
pub const LINE_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.5);

/// World metres per screen pixel of vertical drag.
pub const DRAG_SENSITIVITY: f32 = 0.05;

/// Two presses on the same handle within this window count as a double click.
pub const DOUBLE_CLICK_SECS: f64 = 0.3;
