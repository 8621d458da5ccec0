//! PromptCatalog - categorized edit-instruction templates
//!
//! Loads `.md` templates from a two-level directory tree once and composes
//! selections of them, optionally with free text, into a single instruction.
//!
//! # Layout
//!
//! ```text
//! prompts/
//! ├── color-adjustments/
//! │   ├── warm.md
//! │   └── cool.md
//! └── style/
//!     └── sketch.md
//! ```
//!
//! A template whose first line starts with `#` has that line dropped as a title.

pub mod cli;
mod catalog;
mod compose;
pub mod config;
mod error;
mod template;

pub use catalog::PromptCatalog;
pub use compose::{ADDITIONAL_EDITS_LINE, COMBINED_PREAMBLE, combine, compose_prompt, compose_with_custom_text};
pub use error::CatalogError;
pub use template::PromptTemplate;

/// File extension of template files
pub const TEMPLATE_EXTENSION: &str = "md";
