//! imgedit - instruction-driven image edits with on-disk version history
//!
//! Ties the [`versionstore`] and [`promptcatalog`] crates to a remote edit
//! capability. A user picks an image, composes an instruction from free text
//! and prompt templates, and every successful edit is stored as the next
//! version next to the original.
//!
//! # Modules
//!
//! - [`config`] - Configuration types and loading
//! - [`editor`] - The remote edit trait and the command-backed editor
//! - [`session`] - Per-image edit history with a current version
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod editor;
pub mod session;

// Re-export commonly used types
pub use config::{Config, EditorConfig, PromptsConfig};
pub use editor::{CommandEditor, EditError, EditOutput, EditRequest, ImageEditor, create_editor};
pub use session::{EditOutcome, EditSession, SessionError, version_label};
