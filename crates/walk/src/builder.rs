use std::env;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::PathBuf;

use filters::PatternSet;
use logging::{debug_log, info_log};
use rules::RuleNode;

use crate::error::ScanError;
use crate::filter::PathFilter;
use crate::scanner::{PendingDir, Scanner};

/// File names the scanner looks for in every directory.
#[derive(Clone, Debug)]
pub(crate) struct ScanOptions {
    pub(crate) rules_file_name: OsString,
    pub(crate) ignore_file_name: OsString,
    pub(crate) boundary_marker: OsString,
    pub(crate) follow_symlinks: bool,
}

/// Configures a scan of a source tree.
///
/// Defaults: rule files are named `.header`, ignore files `.gitignore`, and a
/// subdirectory containing `.git` is a separate repository and is skipped.
/// Symlinks are not followed.
///
/// # Examples
///
/// ```
/// use walk::ScanBuilder;
///
/// # fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let temp = tempfile::tempdir()?;
/// std::fs::write(temp.path().join(".header"), "{\n+ *.h\nguards\n}\n")?;
/// std::fs::write(temp.path().join("util.h"), "")?;
///
/// let entries = ScanBuilder::new(temp.path())
///     .build()?
///     .collect::<Result<Vec<_>, _>>()?;
/// let header = entries
///     .iter()
///     .find(|entry| entry.relative_path().ends_with("util.h"))
///     .unwrap();
/// assert!(header.env().guards());
/// # Ok(())
/// # }
/// # demo().unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct ScanBuilder {
    root: PathBuf,
    options: ScanOptions,
    includes: Option<PatternSet>,
    excludes: Option<PatternSet>,
    base_rules: RuleNode,
    global_ignore_file: Option<PathBuf>,
}

impl ScanBuilder {
    /// Creates a builder that scans the directory `root`.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            options: ScanOptions {
                rules_file_name: OsString::from(".header"),
                ignore_file_name: OsString::from(".gitignore"),
                boundary_marker: OsString::from(".git"),
                follow_symlinks: false,
            },
            includes: None,
            excludes: None,
            base_rules: RuleNode::default(),
            global_ignore_file: None,
        }
    }

    /// Name of the per-directory rule file.
    #[must_use]
    pub fn rules_file_name(mut self, name: impl Into<OsString>) -> Self {
        self.options.rules_file_name = name.into();
        self
    }

    /// Name of the per-directory ignore file.
    #[must_use]
    pub fn ignore_file_name(mut self, name: impl Into<OsString>) -> Self {
        self.options.ignore_file_name = name.into();
        self
    }

    /// Entry whose presence marks a nested repository that is not entered.
    #[must_use]
    pub fn boundary_marker(mut self, name: impl Into<OsString>) -> Self {
        self.options.boundary_marker = name.into();
        self
    }

    /// Whether symbolic links are followed.
    ///
    /// A followed link to a regular file is scanned as a file and a link to a
    /// directory is entered, unless that directory is one the scan is already
    /// inside. Links are skipped otherwise.
    #[must_use]
    pub const fn follow_symlinks(mut self, follow: bool) -> Self {
        self.options.follow_symlinks = follow;
        self
    }

    /// Restricts the scan to paths matched by `includes`.
    #[must_use]
    pub fn includes(mut self, includes: PatternSet) -> Self {
        self.includes = Some(includes);
        self
    }

    /// Skips paths matched by `excludes`.
    #[must_use]
    pub fn excludes(mut self, excludes: PatternSet) -> Self {
        self.excludes = Some(excludes);
        self
    }

    /// Rules applied at the root before any rule file is read.
    #[must_use]
    pub fn base_rules(mut self, rules: RuleNode) -> Self {
        self.base_rules = rules;
        self
    }

    /// An ignore file applied to the whole tree, usually the one returned by
    /// [`git::global_excludes_file`](crate::git::global_excludes_file).
    ///
    /// A missing or unreadable file is treated as empty.
    #[must_use]
    pub fn global_ignore_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_ignore_file = Some(path.into());
        self
    }

    /// Resolves the root and the starting rules.
    pub(crate) fn prepare(self) -> Result<(ScanOptions, PendingDir), ScanError> {
        let root = absolutize(self.root)?;
        let metadata =
            fs::metadata(&root).map_err(|error| ScanError::root_metadata(root.clone(), error))?;
        if !metadata.is_dir() {
            return Err(ScanError::root_not_directory(root));
        }
        info_log!(Scan, 1, "scanning {}", root.display());

        let mut rules = self.base_rules;
        if let Some(path) = self.global_ignore_file {
            match fs::read_to_string(&path) {
                Ok(text) => {
                    let ignores = RuleNode::from_ignore_text(&text)
                        .map_err(|error| ScanError::ignore_syntax(path.clone(), error))?;
                    info_log!(Rules, 1, "loaded global ignore file {}", path.display());
                    rules = rules.union(&ignores);
                }
                Err(error) => {
                    debug_log!(Rules, 1, "global ignore file {}: {error}", path.display());
                }
            }
        }

        let canonical = if self.options.follow_symlinks {
            Some(
                fs::canonicalize(&root)
                    .map_err(|error| ScanError::canonicalize(root.clone(), error))?,
            )
        } else {
            None
        };

        let pending = PendingDir {
            fs_path: root,
            relative: PathBuf::new(),
            canonical,
            node: rules,
            filter: PathFilter::new(self.includes, self.excludes),
        };
        Ok((self.options, pending))
    }

    /// Builds a [`Scanner`] over the configured tree.
    ///
    /// # Errors
    ///
    /// Fails when the root is missing or not a directory, or when the root's
    /// own rule or ignore file cannot be loaded.
    pub fn build(self) -> Result<Scanner, ScanError> {
        let (options, root) = self.prepare()?;
        Scanner::new(options, root)
    }
}

fn absolutize(path: PathBuf) -> Result<PathBuf, ScanError> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = env::current_dir().map_err(|error: io::Error| {
        ScanError::canonicalize(PathBuf::from("."), error)
    })?;
    Ok(cwd.join(path))
}
