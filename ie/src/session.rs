//! Edit session: one original image, its history, and a current version
//!
//! Edits always start from the current version so they stack. A new version is
//! written only after the editor succeeds, so a failed or abandoned edit
//! leaves both the files on disk and the current pointer as they were.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};
use versionstore::{VersionError, VersionNumber, VersionStore};

use crate::editor::{EditError, EditRequest, ImageEditor};

/// Errors from session operations
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Please select at least one prompt template or enter custom text")]
    EmptyPrompt,

    #[error("Already at the original; there is no edit to discard")]
    NothingToDiscard,

    #[error("Version {version} is missing on disk: {}", .path.display())]
    MissingVersion { version: VersionNumber, path: PathBuf },

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error("Failed to edit image: {0}")]
    Edit(#[from] EditError),
}

impl SessionError {
    /// Check if this error was caused by what the user asked for
    pub fn is_input_error(&self) -> bool {
        match self {
            SessionError::EmptyPrompt | SessionError::NothingToDiscard => true,
            SessionError::Version(e) => e.is_input_error(),
            SessionError::MissingVersion { .. } | SessionError::Edit(_) => false,
        }
    }
}

/// What a successful edit produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// Number of the new version, now current
    pub version: VersionNumber,
    /// Where it was written
    pub path: PathBuf,
    /// Text the editor sent back, if any
    pub text: Option<String>,
}

/// Editing context for a single original image
///
/// Takes `&mut self` for anything that changes history, so one session can
/// only have one edit in flight.
#[derive(Debug)]
pub struct EditSession {
    store: VersionStore,
    current: VersionNumber,
}

impl EditSession {
    /// Open a session, resuming at the newest version already on disk
    pub fn open(original: impl AsRef<Path>) -> Result<Self, SessionError> {
        Self::from_store(VersionStore::open(original)?)
    }

    /// Wrap an existing store, resuming at its newest version
    pub fn from_store(store: VersionStore) -> Result<Self, SessionError> {
        let current = store.latest_version()?;
        info!(original = ?store.original_path(), current, "Opened edit session");
        Ok(Self { store, current })
    }

    pub fn store(&self) -> &VersionStore {
        &self.store
    }

    pub fn current_version(&self) -> VersionNumber {
        self.current
    }

    /// File the next edit will start from
    pub fn current_path(&self) -> PathBuf {
        self.store.path_for_version(self.current)
    }

    /// `Original` or `Version {n}`
    pub fn label(&self) -> String {
        version_label(self.current)
    }

    /// Run one edit on the current version and store the result as the next version
    pub async fn apply(
        &mut self,
        editor: &dyn ImageEditor,
        prompt: &str,
        aspect_ratio: Option<String>,
    ) -> Result<EditOutcome, SessionError> {
        debug!(current = self.current, prompt_len = prompt.len(), "EditSession::apply: called");
        if prompt.trim().is_empty() {
            return Err(SessionError::EmptyPrompt);
        }

        let source = self.current_path();
        if !source.is_file() {
            return Err(SessionError::MissingVersion {
                version: self.current,
                path: source,
            });
        }

        let request = EditRequest::new(source, prompt).with_aspect_ratio(aspect_ratio);
        let output = editor.edit(request).await?;

        let next = self.current + 1;
        let path = self.store.save_version(&output.image, next)?;
        self.current = next;
        info!(version = next, ?path, "Stored edit");

        Ok(EditOutcome {
            version: next,
            path,
            text: output.text,
        })
    }

    /// Undo the last edit: delete the current version and step back one
    ///
    /// Returns the new current version.
    pub fn discard(&mut self) -> Result<VersionNumber, SessionError> {
        debug!(current = self.current, "EditSession::discard: called");
        if self.current == 0 {
            return Err(SessionError::NothingToDiscard);
        }

        self.store.delete_version(self.current)?;
        self.current -= 1;
        info!(current = self.current, "Discarded version");
        Ok(self.current)
    }
}

/// Human label for a version number
pub fn version_label(n: VersionNumber) -> String {
    if n == 0 {
        "Original".to_string()
    } else {
        format!("Version {}", n)
    }
}
