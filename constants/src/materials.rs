use bevy::color::Color;

pub const WALL_COLOR: Color = Color::WHITE;
pub const ROOF_COLOR: Color = Color::srgb(0.22, 0.28, 0.35);
pub const SECTION_WALL_COLOR: Color = Color::srgb(0.6, 0.6, 0.6);
pub const SECTION_ROOF_COLOR: Color = Color::srgb(0.4, 0.4, 0.4);

/// Opacity of the placement preview.
pub const GHOST_ALPHA: f32 = 0.5;

/// Extra opacity factor for double-sided ghost gable roofs.
pub const GHOST_GABLE_ROOF_FACTOR: f32 = 0.6;

pub const EDGE_COLOR: Color = Color::BLACK;

pub const FOOTPRINT_GUIDE_COLOR: Color = Color::srgb(0.9, 0.2, 0.2);
pub const EXTENSION_GUIDE_COLOR: Color = Color::srgb(1.0, 0.8, 0.0);
pub const RIDGE_GUIDE_COLOR: Color = Color::srgb(1.0, 0.85, 0.3);

/// Dashed guide pattern (metres).
pub const GUIDE_DASH: f32 = 0.4;
pub const GUIDE_GAP: f32 = 0.15;

pub const CLEAR_COLOR: Color = Color::srgb(0.08, 0.09, 0.11);
