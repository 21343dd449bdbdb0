//! Plan, perspective and section cameras sharing one window.
//!
//! Each view renders its own set of layers so a building can look different
//! in every viewport.

/// Mouse and keyboard camera controls plus section target tracking.
pub mod controls;

/// Viewport layout, camera rigs and render layer assignment.
pub mod viewports;
