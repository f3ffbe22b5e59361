use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use rules::Environment;

/// A file selected by the scan, with the settings that apply to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanEntry {
    pub(crate) path: PathBuf,
    pub(crate) relative_path: PathBuf,
    pub(crate) env: Environment,
}

impl ScanEntry {
    /// Path of the file, the scan root joined with
    /// [`relative_path`](Self::relative_path).
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path relative to the scan root.
    #[must_use]
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// The effective settings for the file.
    #[must_use]
    pub const fn env(&self) -> &Environment {
        &self.env
    }

    /// Final component of the path.
    #[must_use]
    pub fn file_name(&self) -> Option<&OsStr> {
        self.relative_path.file_name()
    }

    /// Number of directories between the root and the file.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.relative_path.components().count().saturating_sub(1)
    }

    /// Splits the entry into path, relative path and settings.
    #[must_use]
    pub fn into_parts(self) -> (PathBuf, PathBuf, Environment) {
        (self.path, self.relative_path, self.env)
    }
}
