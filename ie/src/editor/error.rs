//! Edit error types

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Exit status an edit command uses to ask for a retry (EX_TEMPFAIL)
pub const TEMPFAIL_EXIT_CODE: i32 = 75;

/// Errors that can occur during a remote edit
#[derive(Debug, Error)]
pub enum EditError {
    #[error("No edit command configured")]
    NotConfigured,

    #[error("API key not found in ${0} or the configured key file")]
    MissingApiKey(String),

    #[error("Input image not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Failed to run edit command: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Edit command exited with {code:?}: {stderr}")]
    CommandFailed { code: Option<i32>, stderr: String },

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("No image generated")]
    NoImage,

    #[error("Failed to decode generated image: {0}")]
    Image(#[from] image::ImageError),
}

impl EditError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            EditError::Timeout(_) => true,
            EditError::CommandFailed { code, .. } => *code == Some(TEMPFAIL_EXIT_CODE),
            EditError::NotConfigured
            | EditError::MissingApiKey(_)
            | EditError::InputNotFound(_)
            | EditError::Spawn(_)
            | EditError::NoImage
            | EditError::Image(_) => false,
        }
    }
}
