//! Startup loading that gates the `Running` state.

/// Editor config loading with fallback to built-in defaults.
pub mod config_loader;
