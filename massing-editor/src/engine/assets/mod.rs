//! Runtime editor configuration loaded from JSON.

/// Maps, ground scale, roof transparency and per-roof building defaults.
pub mod editor_config;
