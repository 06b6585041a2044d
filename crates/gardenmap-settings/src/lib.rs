//! Gardenmap Settings Crate
//!
//! Handles editor configuration: snapping and connection thresholds, zoom
//! limits and storage locations, loaded from JSON or TOML files.

pub mod config;
pub mod error;

pub use config::{Config, EditorSettings, StorageSettings, ViewportSettings, ZoomRange};
pub use error::{ConfigError, SettingsError, SettingsResult};
