//! Upload collaborator.
//!
//! Image bytes never live in the piece store; they are handed to an upload
//! service which answers with a path that pieces reference.

use async_trait::async_trait;
use gardenmap_core::{Result, UploadError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Answer from the upload service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    /// Public path of the stored image; present on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl UploadResponse {
    pub fn accepted(path: impl Into<String>) -> Self {
        Self {
            success: true,
            path: Some(path.into()),
        }
    }

    pub fn rejected() -> Self {
        Self {
            success: false,
            path: None,
        }
    }
}

/// Stores, lists and deletes uploaded images.
#[async_trait]
pub trait UploadService: Send + Sync {
    /// Stores `bytes` under `file_name`.
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadResponse>;

    /// File names of every stored image, sorted.
    async fn list(&self) -> Result<Vec<String>>;

    /// Deletes a stored image.
    async fn delete(&self, file_name: &str) -> Result<()>;
}

/// Upload service backed by a local directory.
#[derive(Debug, Clone)]
pub struct LocalUploadService {
    root: PathBuf,
    public_prefix: String,
}

impl LocalUploadService {
    pub fn new(root: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Public path for a stored file name.
    pub fn public_path(&self, file_name: &str) -> String {
        format!("{}/{}", self.public_prefix, file_name)
    }

    /// Reduces a client-supplied name to its final path component.
    pub fn sanitize_file_name(file_name: &str) -> Result<String> {
        let name = Path::new(file_name.trim())
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty() && *n != "." && *n != "..")
            .ok_or_else(|| UploadError::InvalidFileName {
                file_name: file_name.to_string(),
            })?;
        Ok(name.to_string())
    }
}

fn transport(err: std::io::Error) -> UploadError {
    UploadError::Transport {
        reason: err.to_string(),
    }
}

#[async_trait]
impl UploadService for LocalUploadService {
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadResponse> {
        let name = Self::sanitize_file_name(file_name)?;
        if bytes.is_empty() {
            tracing::warn!("Rejecting empty upload '{}'", name);
            return Ok(UploadResponse::rejected());
        }

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(transport)?;
        tokio::fs::write(self.root.join(&name), &bytes)
            .await
            .map_err(transport)?;

        tracing::info!("Stored upload '{}' ({} bytes)", name, bytes.len());
        Ok(UploadResponse::accepted(self.public_path(&name)))
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(transport(err).into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(transport)? {
            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);
            if let (true, Some(name)) = (is_file, entry.file_name().to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    async fn delete(&self, file_name: &str) -> Result<()> {
        let name = Self::sanitize_file_name(file_name)?;
        match tokio::fs::remove_file(self.root.join(&name)).await {
            Ok(()) => {
                tracing::info!("Deleted upload '{}'", name);
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(UploadError::NotFound { file_name: name }.into())
            }
            Err(err) => Err(transport(err).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_final_component() {
        assert_eq!(
            LocalUploadService::sanitize_file_name("../../etc/meadow.png").unwrap(),
            "meadow.png"
        );
        assert_eq!(
            LocalUploadService::sanitize_file_name("pond.png").unwrap(),
            "pond.png"
        );
        assert!(LocalUploadService::sanitize_file_name("").is_err());
        assert!(LocalUploadService::sanitize_file_name("..").is_err());
    }

    #[test]
    fn test_public_path_trims_prefix() {
        let service = LocalUploadService::new("/tmp/unused", "/uploads/");
        assert_eq!(service.public_path("a.png"), "/uploads/a.png");
    }

    #[tokio::test]
    async fn test_upload_list_delete() {
        let dir = tempfile::tempdir().unwrap();
        let service = LocalUploadService::new(dir.path().join("uploads"), "/uploads");

        assert!(service.list().await.unwrap().is_empty());

        let response = service.upload("b.png", vec![1, 2, 3]).await.unwrap();
        assert_eq!(response, UploadResponse::accepted("/uploads/b.png"));
        service.upload("a.png", vec![4]).await.unwrap();
        assert_eq!(service.list().await.unwrap(), vec!["a.png", "b.png"]);

        service.delete("a.png").await.unwrap();
        let err = service.delete("a.png").await.unwrap_err();
        assert!(err.is_upload_error());
        assert_eq!(service.list().await.unwrap(), vec!["b.png"]);
    }

    #[tokio::test]
    async fn test_empty_upload_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let service = LocalUploadService::new(dir.path(), "/uploads");
        let response = service.upload("empty.png", Vec::new()).await.unwrap();
        assert!(!response.success);
        assert!(response.path.is_none());
    }
}
