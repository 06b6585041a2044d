//! Error handling for gardenmap
//!
//! Only the outer collaborators can fail: image uploads and durable storage.
//! Geometry, scoring and store mutations never error; they return degenerate
//! values or become no-ops instead.
//!
//! All error types use `thiserror`.

use thiserror::Error;

/// Upload collaborator error type
#[derive(Error, Debug, Clone)]
pub enum UploadError {
    /// The upload service answered but reported failure
    #[error("Upload of {file_name} was rejected")]
    Rejected {
        /// The name of the file that was rejected.
        file_name: String,
    },

    /// The file name has no usable final component
    #[error("Invalid upload file name: {file_name}")]
    InvalidFileName {
        /// The offending file name.
        file_name: String,
    },

    /// The requested image does not exist in the gallery
    #[error("Image not found: {file_name}")]
    NotFound {
        /// The name of the missing image.
        file_name: String,
    },

    /// Transport-level failure talking to the upload service
    #[error("Upload transport error: {reason}")]
    Transport {
        /// The reason for the failure.
        reason: String,
    },
}

/// Persistence collaborator error type
#[derive(Error, Debug)]
pub enum StorageError {
    /// The persisted document could not be parsed
    #[error("Corrupted map document in namespace {namespace}: {source}")]
    Corrupted {
        /// The namespace being loaded.
        namespace: String,
        /// The underlying parse error.
        source: serde_json::Error,
    },

    /// The namespace contains characters that cannot be stored
    #[error("Invalid storage namespace: {namespace}")]
    InvalidNamespace {
        /// The offending namespace.
        namespace: String,
    },

    /// The document could not be serialized
    #[error("Failed to serialize map document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Main error type for gardenmap
#[derive(Error, Debug)]
pub enum Error {
    /// Upload error
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Storage error
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Image decoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is an upload error
    pub fn is_upload_error(&self) -> bool {
        matches!(self, Error::Upload(_))
    }

    /// Check if this is a storage error
    pub fn is_storage_error(&self) -> bool {
        matches!(self, Error::Storage(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
