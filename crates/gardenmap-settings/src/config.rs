//! Configuration and settings management for gardenmap
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML files; the format is chosen by file extension.
//!
//! Configuration is organized into logical sections:
//! - Editor tuning (snap/connect thresholds, size floor, sampling)
//! - Viewport zoom limits for the builder and the read-only viewer
//! - Storage locations (map documents, uploaded images)

use crate::error::{ConfigError, SettingsError, SettingsResult};
use gardenmap_core::constants;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Inclusive zoom bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomRange {
    pub min: f64,
    pub max: f64,
}

impl ZoomRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Editor tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Snap distance for dragged pieces, in world units
    pub snap_threshold: f64,
    /// Edge distance counted as adjacent by auto-connect, in world units
    pub connect_threshold: f64,
    /// Smallest width/height a resize can produce
    pub min_piece_size: f64,
    /// Samples taken along each image edge
    pub sample_count: usize,
    /// Placement suggestions offered per pending piece
    pub max_suggestions: usize,
    /// Longest thumbnail side in pixels
    pub thumbnail_size: u32,
    /// Screen padding kept on zoom-to-fit
    pub fit_padding: f64,
    /// Multiplicative zoom step
    pub zoom_step: f64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            snap_threshold: constants::SNAP_THRESHOLD,
            connect_threshold: constants::CONNECT_THRESHOLD,
            min_piece_size: constants::MIN_PIECE_SIZE,
            sample_count: constants::DEFAULT_SAMPLE_COUNT,
            max_suggestions: constants::MAX_SUGGESTIONS,
            thumbnail_size: constants::THUMBNAIL_SIZE,
            fit_padding: constants::FIT_PADDING,
            zoom_step: constants::ZOOM_STEP,
        }
    }
}

/// Zoom limits per canvas flavour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    /// Editable map builder
    pub builder: ZoomRange,
    /// Read-only map viewer
    pub viewer: ZoomRange,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            builder: ZoomRange::new(constants::BUILDER_MIN_ZOOM, constants::BUILDER_MAX_ZOOM),
            viewer: ZoomRange::new(constants::VIEWER_MIN_ZOOM, constants::VIEWER_MAX_ZOOM),
        }
    }
}

/// Storage locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding persisted map documents; platform data dir when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Namespace the map layout is stored under
    pub namespace: String,
    /// Directory holding uploaded images; `<data_dir>/uploads` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_dir: Option<PathBuf>,
    /// Prefix of the image paths handed back by the upload service
    pub public_prefix: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            namespace: constants::DEFAULT_NAMESPACE.to_string(),
            upload_dir: None,
            public_prefix: constants::DEFAULT_PUBLIC_PREFIX.to_string(),
        }
    }
}

impl StorageSettings {
    /// Directory for map documents, falling back to the platform data dir.
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("gardenmap"))
                .unwrap_or_else(|| PathBuf::from(".gardenmap"))
        })
    }

    /// Directory for uploaded images.
    pub fn resolved_upload_dir(&self) -> PathBuf {
        self.upload_dir
            .clone()
            .unwrap_or_else(|| self.resolved_data_dir().join("uploads"))
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Editor tuning
    pub editor: EditorSettings,
    /// Zoom limits
    pub viewport: ViewportSettings,
    /// Storage locations
    pub storage: StorageSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location in the platform config dir.
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join("gardenmap").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no platform config directory".to_string())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match Format::from_path(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load config from file, or defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::from_path(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let editor = &self.editor;
        positive("editor.snap_threshold", editor.snap_threshold)?;
        positive("editor.connect_threshold", editor.connect_threshold)?;
        positive("editor.min_piece_size", editor.min_piece_size)?;
        if !(editor.fit_padding.is_finite() && editor.fit_padding >= 0.0) {
            return Err(out_of_range("editor.fit_padding", editor.fit_padding));
        }

        if editor.sample_count == 0 {
            return Err(out_of_range("editor.sample_count", editor.sample_count));
        }
        if editor.max_suggestions == 0 {
            return Err(out_of_range("editor.max_suggestions", editor.max_suggestions));
        }
        if editor.thumbnail_size == 0 {
            return Err(out_of_range("editor.thumbnail_size", editor.thumbnail_size));
        }
        if !(editor.zoom_step.is_finite() && editor.zoom_step > 1.0) {
            return Err(out_of_range("editor.zoom_step", editor.zoom_step));
        }

        zoom_range("viewport.builder", &self.viewport.builder)?;
        zoom_range("viewport.viewer", &self.viewport.viewer)?;

        if self.storage.namespace.trim().is_empty() {
            return Err(out_of_range("storage.namespace", "\"\""));
        }

        Ok(())
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

fn out_of_range(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::ValueOutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn positive(key: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(out_of_range(key, value))
    }
}

fn zoom_range(key: &str, range: &ZoomRange) -> Result<(), ConfigError> {
    positive(key, range.min)?;
    if !(range.max.is_finite() && range.max >= range.min) {
        return Err(out_of_range(key, format!("{}..{}", range.min, range.max)));
    }
    Ok(())
}
