//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, the loading to
//! running transition and the ordering of the per-frame editing pipeline.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with the editor plugins, config loading and
/// platform-specific configurations.
pub mod app_setup;

/// Application state and the system sets that order each frame.
pub mod app_state;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
