//! VersionStore - directory-based edit history for a single image
//!
//! Every original image gets a sibling directory named after its file stem.
//! The original's bytes are copied into it once, and each successful edit is
//! written next to it as a numbered PNG.
//!
//! # Layout
//!
//! ```text
//! photos/
//! ├── beach.jpg            # untouched external original
//! └── beach/
//!     ├── original.png     # version 0, copied from beach.jpg
//!     ├── v1.png
//!     ├── v2.png
//!     └── ...
//! ```
//!
//! # Example
//!
//! ```ignore
//! use versionstore::VersionStore;
//!
//! let store = VersionStore::open("photos/beach.jpg")?;
//! let path = store.save_version(&edited, 1)?;
//! assert_eq!(store.list_versions()?.len(), 2);
//! ```

pub mod cli;
mod error;
mod store;

pub use error::VersionError;
pub use store::{VersionNumber, VersionStore};

/// File name of the stored copy of the original (version 0)
pub const ORIGINAL_FILE_NAME: &str = "original.png";

/// Prefix of numbered version files (`v1.png`, `v2.png`, ...)
pub const VERSION_PREFIX: &str = "v";

/// Extension of every file the store writes
pub const VERSION_EXTENSION: &str = "png";
