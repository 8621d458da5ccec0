//! Core VersionStore implementation

use image::{DynamicImage, ImageFormat, ImageReader};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::VersionError;
use crate::{ORIGINAL_FILE_NAME, VERSION_EXTENSION, VERSION_PREFIX};

/// Version number: 0 is the stored original, 1.. are edits
pub type VersionNumber = u32;

/// On-disk edit history for one original image
///
/// Single-writer: nothing here locks the version directory, so two stores
/// for the same original must not write concurrently.
#[derive(Debug, Clone)]
pub struct VersionStore {
    /// The external original, never modified
    original_path: PathBuf,
    /// Sibling directory holding `original.png` and `v{n}.png`
    version_dir: PathBuf,
}

impl VersionStore {
    /// Open the version store for an original image, creating it if needed
    ///
    /// Creates `<parent>/<stem>/` and copies the original to
    /// `<parent>/<stem>/original.png` unless that copy already exists.
    /// Re-opening never touches an existing copy or any stored version.
    pub fn open(original: impl AsRef<Path>) -> Result<Self, VersionError> {
        let original_path = original.as_ref().to_path_buf();
        debug!(?original_path, "VersionStore::open: called");

        if !original_path.is_file() {
            return Err(VersionError::OriginalNotFound(original_path));
        }

        let stem = original_path
            .file_stem()
            .ok_or_else(|| VersionError::InvalidOriginalPath(original_path.clone()))?;
        let parent = original_path.parent().unwrap_or_else(|| Path::new(""));
        let version_dir = parent.join(stem);

        fs::create_dir_all(&version_dir)?;

        let store = Self {
            original_path,
            version_dir,
        };

        let stored_original = store.original_copy_path();
        if !stored_original.exists() {
            fs::copy(&store.original_path, &stored_original)?;
            info!(original = ?store.original_path, copy = ?stored_original, "Stored copy of original");
        } else {
            debug!(?stored_original, "VersionStore::open: stored original already present");
        }

        Ok(store)
    }

    /// The external original this store was opened for
    pub fn original_path(&self) -> &Path {
        &self.original_path
    }

    /// Directory holding the stored original and all versions
    pub fn version_dir(&self) -> &Path {
        &self.version_dir
    }

    fn original_copy_path(&self) -> PathBuf {
        self.version_dir.join(ORIGINAL_FILE_NAME)
    }

    /// Write `image` as `v{n}.png`, replacing any existing file with that number
    ///
    /// Numbering is the caller's job; the store does not pick the next number.
    pub fn save_version(&self, image: &DynamicImage, n: VersionNumber) -> Result<PathBuf, VersionError> {
        debug!(%n, width = image.width(), height = image.height(), "VersionStore::save_version: called");
        if n == 0 {
            return Err(VersionError::InvalidVersion(n));
        }

        let path = self.path_for_version(n);
        image.save_with_format(&path, ImageFormat::Png)?;
        info!(version = n, ?path, "Saved version");
        Ok(path)
    }

    /// Path of version `n`; 0 is the stored original
    ///
    /// Does not check that the file exists.
    pub fn path_for_version(&self, n: VersionNumber) -> PathBuf {
        if n == 0 {
            self.original_copy_path()
        } else {
            self.version_dir
                .join(format!("{}{}.{}", VERSION_PREFIX, n, VERSION_EXTENSION))
        }
    }

    /// Remove `v{n}.png`
    ///
    /// Version 0 is rejected. A missing file is not an error.
    pub fn delete_version(&self, n: VersionNumber) -> Result<(), VersionError> {
        debug!(%n, "VersionStore::delete_version: called");
        if n == 0 {
            return Err(VersionError::InvalidVersion(n));
        }

        let path = self.path_for_version(n);
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(version = n, ?path, "Deleted version");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(?path, "VersionStore::delete_version: nothing to delete");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// All stored files, `[original, v1, v2, ...]`, rescanned from disk
    pub fn list_versions(&self) -> Result<Vec<PathBuf>, VersionError> {
        let mut paths = Vec::new();

        let original = self.original_copy_path();
        if original.exists() {
            paths.push(original);
        }

        paths.extend(self.version_numbers()?.into_iter().map(|n| self.path_for_version(n)));
        debug!(count = paths.len(), "VersionStore::list_versions: scanned");
        Ok(paths)
    }

    /// Number of `v{n}.png` files on disk, not counting the original
    pub fn version_count(&self) -> Result<usize, VersionError> {
        Ok(self.version_numbers()?.len())
    }

    /// Highest version number on disk, or 0 when only the original exists
    pub fn latest_version(&self) -> Result<VersionNumber, VersionError> {
        Ok(self.version_numbers()?.last().copied().unwrap_or(0))
    }

    /// Version numbers present on disk, ascending
    pub fn version_numbers(&self) -> Result<Vec<VersionNumber>, VersionError> {
        let mut numbers = Vec::new();

        for entry in fs::read_dir(&self.version_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(n) = entry.file_name().to_str().and_then(parse_version_file_name) {
                numbers.push(n);
            }
        }

        numbers.sort_unstable();
        Ok(numbers)
    }

    /// Decode version `n` from disk
    pub fn load_version(&self, n: VersionNumber) -> Result<DynamicImage, VersionError> {
        let path = self.path_for_version(n);
        debug!(%n, ?path, "VersionStore::load_version: called");
        // The stored original keeps the source bytes, which may not be PNG
        let image = ImageReader::open(&path)?.with_guessed_format()?.decode()?;
        Ok(image)
    }
}

/// Parse `v{n}.png` into `n`; anything else is not a version file
fn parse_version_file_name(name: &str) -> Option<VersionNumber> {
    let digits = name
        .strip_prefix(VERSION_PREFIX)?
        .strip_suffix(VERSION_EXTENSION)?
        .strip_suffix('.')?;

    if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
