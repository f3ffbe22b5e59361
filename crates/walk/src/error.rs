use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use filters::IgnoreFileError;
use rules::RuleError;

/// Error returned when a scan fails.
///
/// The scan ends after the first error; the iterator yields nothing further.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ScanError {
    kind: ScanErrorKind,
}

impl ScanError {
    pub(crate) const fn new(kind: ScanErrorKind) -> Self {
        Self { kind }
    }

    pub(crate) const fn root_metadata(path: PathBuf, source: io::Error) -> Self {
        Self::new(ScanErrorKind::RootMetadata { path, source })
    }

    pub(crate) const fn root_not_directory(path: PathBuf) -> Self {
        Self::new(ScanErrorKind::RootNotDirectory { path })
    }

    pub(crate) const fn read_dir(path: PathBuf, source: io::Error) -> Self {
        Self::new(ScanErrorKind::ReadDir { path, source })
    }

    pub(crate) const fn read_dir_entry(path: PathBuf, source: io::Error) -> Self {
        Self::new(ScanErrorKind::ReadDirEntry { path, source })
    }

    pub(crate) const fn metadata(path: PathBuf, source: io::Error) -> Self {
        Self::new(ScanErrorKind::Metadata { path, source })
    }

    pub(crate) const fn canonicalize(path: PathBuf, source: io::Error) -> Self {
        Self::new(ScanErrorKind::Canonicalize { path, source })
    }

    pub(crate) const fn read_rules(path: PathBuf, source: io::Error) -> Self {
        Self::new(ScanErrorKind::ReadRules { path, source })
    }

    pub(crate) const fn rule_syntax(path: PathBuf, source: RuleError) -> Self {
        Self::new(ScanErrorKind::RuleSyntax { path, source })
    }

    pub(crate) const fn ignore_syntax(path: PathBuf, source: IgnoreFileError) -> Self {
        Self::new(ScanErrorKind::IgnoreSyntax { path, source })
    }

    /// The specific failure that ended the scan.
    #[must_use]
    pub const fn kind(&self) -> &ScanErrorKind {
        &self.kind
    }

    /// The path the failure concerns.
    ///
    /// # Examples
    ///
    /// ```
    /// use walk::ScanBuilder;
    ///
    /// let error = match ScanBuilder::new("./definitely_missing_root").build() {
    ///     Ok(_) => panic!("missing root yields error"),
    ///     Err(error) => error,
    /// };
    /// assert!(error.path().ends_with("definitely_missing_root"));
    /// ```
    #[must_use]
    pub fn path(&self) -> &Path {
        self.kind.path()
    }
}

/// Classification of scan failures.
#[derive(Debug, thiserror::Error)]
pub enum ScanErrorKind {
    /// Failed to query the root's metadata.
    #[error("failed to inspect scan root '{}': {source}", path.display())]
    RootMetadata {
        /// Root path provided by the caller.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The root is not a directory.
    #[error("scan root '{}' is not a directory", path.display())]
    RootNotDirectory {
        /// Root path provided by the caller.
        path: PathBuf,
    },
    /// Failed to list a directory.
    #[error("failed to read directory '{}': {source}", path.display())]
    ReadDir {
        /// Directory being listed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Failed to read an entry while listing a directory.
    #[error("failed to read entry in '{}': {source}", path.display())]
    ReadDirEntry {
        /// Directory being listed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Failed to query an entry's metadata.
    #[error("failed to inspect metadata for '{}': {source}", path.display())]
    Metadata {
        /// Entry whose metadata was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Failed to resolve a directory's canonical path.
    #[error("failed to canonicalize '{}': {source}", path.display())]
    Canonicalize {
        /// Path being canonicalized.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A rule or ignore file exists but could not be read.
    #[error("failed to read '{}': {source}", path.display())]
    ReadRules {
        /// The rule or ignore file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A rule file failed to parse.
    #[error("{}: {source}", path.display())]
    RuleSyntax {
        /// The rule file.
        path: PathBuf,
        /// Parse failure with its line number.
        #[source]
        source: RuleError,
    },
    /// An ignore file holds an invalid pattern.
    #[error("{}: {source}", path.display())]
    IgnoreSyntax {
        /// The ignore file.
        path: PathBuf,
        /// Pattern failure with its line number.
        #[source]
        source: IgnoreFileError,
    },
}

impl ScanErrorKind {
    /// The path the failure concerns.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::RootMetadata { path, .. }
            | Self::RootNotDirectory { path }
            | Self::ReadDir { path, .. }
            | Self::ReadDirEntry { path, .. }
            | Self::Metadata { path, .. }
            | Self::Canonicalize { path, .. }
            | Self::ReadRules { path, .. }
            | Self::RuleSyntax { path, .. }
            | Self::IgnoreSyntax { path, .. } => path,
        }
    }

    /// Returns `true` for failures caused by rule or ignore file contents.
    #[must_use]
    pub const fn is_syntax(&self) -> bool {
        matches!(self, Self::RuleSyntax { .. } | Self::IgnoreSyntax { .. })
    }
}

/// Error returned by the `git` helpers.
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    /// `git` could not be started.
    #[error("failed to run git: {source}")]
    Spawn {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// `git` exited unsuccessfully.
    #[error("git {command} failed ({status}): {stderr}")]
    Failed {
        /// Subcommand that failed.
        command: &'static str,
        /// Exit status.
        status: ExitStatus,
        /// Trimmed standard error output.
        stderr: String,
    },
    /// `git` printed something that is not a path.
    #[error("git {command} printed non UTF-8 output")]
    InvalidOutput {
        /// Subcommand whose output was rejected.
        command: &'static str,
    },
}
