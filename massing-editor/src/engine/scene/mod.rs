//! Scene context around the buildings.

/// Background map plane sized from the image and the pixels-per-unit scale.
pub mod ground;
