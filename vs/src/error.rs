//! VersionStore error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while managing image versions
#[derive(Debug, Error)]
pub enum VersionError {
    #[error("Original image not found: {}", .0.display())]
    OriginalNotFound(PathBuf),

    #[error("Original image path has no file name: {}", .0.display())]
    InvalidOriginalPath(PathBuf),

    #[error("Invalid version number {0}: the original (version 0) cannot be written or deleted")]
    InvalidVersion(u32),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl VersionError {
    /// Check if this error was caused by bad caller input rather than the filesystem
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            VersionError::OriginalNotFound(_) | VersionError::InvalidOriginalPath(_) | VersionError::InvalidVersion(_)
        )
    }
}
