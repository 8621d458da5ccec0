//! PromptCatalog error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or querying the catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Prompts directory not found: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("Prompt template not found: {0}")]
    TemplateNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
