//! Remote image edits
//!
//! An edit takes the current version's file and a composed instruction and
//! produces a new image plus an optional text reply. The call may fail; a
//! failure never touches the version store.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use image::DynamicImage;
use tracing::debug;

mod command;
mod error;

pub use command::CommandEditor;
pub use error::{EditError, TEMPFAIL_EXIT_CODE};

use crate::config::EditorConfig;

/// One edit to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    /// Image to edit, normally the session's current version
    pub image_path: PathBuf,
    /// Instruction text
    pub prompt: String,
    /// Requested output aspect ratio; passed to the editor untouched
    pub aspect_ratio: Option<String>,
}

impl EditRequest {
    pub fn new(image_path: impl Into<PathBuf>, prompt: impl Into<String>) -> Self {
        Self {
            image_path: image_path.into(),
            prompt: prompt.into(),
            aspect_ratio: None,
        }
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: Option<String>) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }
}

/// Result of a successful edit
#[derive(Debug, Clone)]
pub struct EditOutput {
    /// The edited image, decoded
    pub image: DynamicImage,
    /// Any text the model sent back alongside the image
    pub text: Option<String>,
}

/// Performs image edits
///
/// Each call completes exactly once with an image or an error.
#[async_trait]
pub trait ImageEditor: Send + Sync {
    async fn edit(&self, request: EditRequest) -> Result<EditOutput, EditError>;
}

/// Create the editor described by the configuration
pub fn create_editor(config: &EditorConfig) -> Result<Arc<dyn ImageEditor>, EditError> {
    debug!(command = %config.command, "create_editor: called");
    Ok(Arc::new(CommandEditor::from_config(config)?))
}
