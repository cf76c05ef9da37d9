/// Error types shared across the application
///
/// Storage errors stay inside the store (they are logged, never shown),
/// upload errors travel through UI messages and end up in an alert.

use thiserror::Error;

/// Failures of the persistence layer
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("failed to prepare data directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not determine user data directory")]
    NoDataDir,

    /// The persisted collection is not valid JSON (or has the wrong shape)
    #[error("persisted stories are corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Failures of a single upload. Terminal for that user action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("File is too large ({size} bytes, limit is {limit} bytes). Please select a smaller image.")]
    Oversized { size: u64, limit: u64 },

    #[error("Failed to process image: {0}")]
    ImageProcessing(String),

    #[error("Failed to read file: {0}")]
    Read(String),
}

impl From<image::ImageError> for UploadError {
    fn from(err: image::ImageError) -> Self {
        UploadError::ImageProcessing(err.to_string())
    }
}

/// Failures while reading the optional config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}
