//! Configuration loading for the Wareflow client
//!
//! Environment variables win over config files; see [`loader`] for the
//! probing order and supported formats.

pub mod loader;

pub use loader::{load, load_from_env, load_from_file, probe_config_paths};
