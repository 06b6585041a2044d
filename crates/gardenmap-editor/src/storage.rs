//! Durable storage of the map layout.
//!
//! The layout is persisted as a single [`MapDocument`] per namespace. Two
//! backends are provided: [`JsonFileStorage`] writes one `<namespace>.json`
//! file per namespace, and [`MemoryStorage`] keeps documents in memory for
//! tests and headless use.

use crate::piece::MapPiece;
use chrono::{DateTime, Utc};
use gardenmap_core::{Result, StorageError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Current document format version.
pub const DOCUMENT_VERSION: &str = "1.0";

fn default_true() -> bool {
    true
}

fn default_version() -> String {
    DOCUMENT_VERSION.to_string()
}

/// The persisted map layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDocument {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub pieces: Vec<MapPiece>,
    #[serde(default = "default_true")]
    pub show_connections: bool,
    #[serde(default = "default_true")]
    pub snap_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Default for MapDocument {
    fn default() -> Self {
        Self {
            version: default_version(),
            pieces: Vec::new(),
            show_connections: true,
            snap_enabled: true,
            saved_at: None,
        }
    }
}

impl MapDocument {
    pub fn new(pieces: Vec<MapPiece>, show_connections: bool, snap_enabled: bool) -> Self {
        Self {
            pieces,
            show_connections,
            snap_enabled,
            ..Self::default()
        }
    }

    /// Stamps the document with the current time.
    pub fn touch(&mut self) {
        self.saved_at = Some(Utc::now());
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self).map_err(StorageError::Serialize)?)
    }

    pub fn from_json(namespace: &str, json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| {
            StorageError::Corrupted {
                namespace: namespace.to_string(),
                source,
            }
            .into()
        })
    }
}

/// Persistence collaborator for map documents.
pub trait MapStorage {
    /// Loads the document stored under `namespace`, or `None` if nothing
    /// has been saved yet.
    fn load(&self, namespace: &str) -> Result<Option<MapDocument>>;

    /// Replaces the document stored under `namespace`.
    fn save(&mut self, namespace: &str, document: &MapDocument) -> Result<()>;
}

/// Namespaces become file names, so only a conservative character set is
/// accepted.
fn validate_namespace(namespace: &str) -> std::result::Result<(), StorageError> {
    let valid = !namespace.is_empty()
        && !namespace.starts_with('.')
        && namespace
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidNamespace {
            namespace: namespace.to_string(),
        })
    }
}

/// One JSON file per namespace inside a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `namespace`.
    pub fn path_for(&self, namespace: &str) -> PathBuf {
        self.dir.join(format!("{}.json", namespace))
    }
}

impl MapStorage for JsonFileStorage {
    fn load(&self, namespace: &str) -> Result<Option<MapDocument>> {
        validate_namespace(namespace)?;
        let path = self.path_for(namespace);
        if !path.exists() {
            tracing::debug!("No saved map at {:?}", path);
            return Ok(None);
        }

        let json = fs::read_to_string(&path)?;
        let document = MapDocument::from_json(namespace, &json)?;
        tracing::info!(
            "Loaded {} pieces from {:?}",
            document.pieces.len(),
            path
        );
        Ok(Some(document))
    }

    fn save(&mut self, namespace: &str, document: &MapDocument) -> Result<()> {
        validate_namespace(namespace)?;
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(namespace);
        let temp = self.dir.join(format!("{}.json.tmp", namespace));
        fs::write(&temp, document.to_json()?)?;
        fs::rename(&temp, &path)?;

        tracing::info!("Saved {} pieces to {:?}", document.pieces.len(), path);
        Ok(())
    }
}

/// In-memory storage; documents are kept serialized so a round trip goes
/// through the same format as the file backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    documents: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores raw JSON under `namespace`, bypassing serialization.
    pub fn insert_raw(&mut self, namespace: impl Into<String>, json: impl Into<String>) {
        self.documents.insert(namespace.into(), json.into());
    }

    pub fn raw(&self, namespace: &str) -> Option<&str> {
        self.documents.get(namespace).map(String::as_str)
    }
}

impl MapStorage for MemoryStorage {
    fn load(&self, namespace: &str) -> Result<Option<MapDocument>> {
        validate_namespace(namespace)?;
        self.documents
            .get(namespace)
            .map(|json| MapDocument::from_json(namespace, json))
            .transpose()
    }

    fn save(&mut self, namespace: &str, document: &MapDocument) -> Result<()> {
        validate_namespace(namespace)?;
        self.documents
            .insert(namespace.to_string(), document.to_json()?);
        Ok(())
    }
}
