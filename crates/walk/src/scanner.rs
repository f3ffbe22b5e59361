use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::vec;

use logging::{debug_log, info_log};
use rules::RuleNode;

use crate::builder::ScanOptions;
use crate::entry::ScanEntry;
use crate::error::ScanError;
use crate::filter::PathFilter;

/// A directory that passed every check and is about to be listed.
#[derive(Clone, Debug)]
pub(crate) struct PendingDir {
    pub(crate) fs_path: PathBuf,
    pub(crate) relative: PathBuf,
    /// Resolved location, tracked only while following symlinks.
    pub(crate) canonical: Option<PathBuf>,
    pub(crate) node: RuleNode,
    pub(crate) filter: PathFilter,
}

#[derive(Clone, Debug)]
pub(crate) struct Subdir {
    name: OsString,
    symlink: bool,
}

/// A listed directory with the rules that apply inside it.
#[derive(Debug)]
pub(crate) struct DirectoryState {
    fs_path: PathBuf,
    relative: PathBuf,
    canonical: Option<PathBuf>,
    node: RuleNode,
    filter: PathFilter,
    files: vec::IntoIter<OsString>,
    dirs: vec::IntoIter<Subdir>,
}

impl DirectoryState {
    /// Loads the directory's ignore and rule files, then lists it.
    pub(crate) fn open(options: &ScanOptions, pending: PendingDir) -> Result<Self, ScanError> {
        let PendingDir {
            fs_path,
            relative,
            canonical,
            node,
            filter,
        } = pending;
        debug_log!(Scan, 1, "entering {}", fs_path.display());

        let node = load_rules(options, &fs_path, node)?;
        let (files, dirs) = list_directory(options, &fs_path)?;
        debug_log!(
            Scan,
            2,
            "{}: {} files, {} directories",
            fs_path.display(),
            files.len(),
            dirs.len()
        );

        Ok(Self {
            fs_path,
            relative,
            canonical,
            node,
            filter,
            files: files.into_iter(),
            dirs: dirs.into_iter(),
        })
    }

    pub(crate) fn canonical(&self) -> Option<&Path> {
        self.canonical.as_deref()
    }

    /// The next file of this directory that is neither filtered nor ignored.
    pub(crate) fn next_file(&mut self) -> Option<ScanEntry> {
        for name in self.files.by_ref() {
            let text = name.to_string_lossy();
            let relative_path = self.relative.join(&name);
            if !self.filter.admits_file(&text) {
                info_log!(Skip, 2, "filtered {}", relative_path.display());
                continue;
            }
            let Some(env) = self.node.effective_env(&text) else {
                info_log!(Skip, 1, "ignored {}", relative_path.display());
                continue;
            };
            return Some(ScanEntry {
                path: self.fs_path.join(&name),
                relative_path,
                env,
            });
        }
        None
    }

    /// Every remaining file, in order.
    #[cfg(feature = "parallel")]
    pub(crate) fn drain_files(&mut self) -> Vec<ScanEntry> {
        std::iter::from_fn(|| self.next_file()).collect()
    }

    /// The next subdirectory to enter, with its derived rules and filter.
    ///
    /// `is_ancestor` reports whether a canonical path is one of the
    /// directories above this one. Followed links back into this directory or
    /// any of them are skipped.
    pub(crate) fn next_dir(
        &mut self,
        options: &ScanOptions,
        is_ancestor: impl Fn(&Path) -> bool,
    ) -> Option<Result<PendingDir, ScanError>> {
        while let Some(subdir) = self.dirs.next() {
            match self.child(options, &subdir, &is_ancestor) {
                Ok(Some(pending)) => return Some(Ok(pending)),
                Ok(None) => {}
                Err(error) => return Some(Err(error)),
            }
        }
        None
    }

    /// Every remaining subdirectory to enter, in order.
    #[cfg(feature = "parallel")]
    pub(crate) fn drain_dirs(
        &mut self,
        options: &ScanOptions,
        is_ancestor: impl Fn(&Path) -> bool,
    ) -> Result<Vec<PendingDir>, ScanError> {
        std::iter::from_fn(|| self.next_dir(options, &is_ancestor)).collect()
    }

    fn child(
        &self,
        options: &ScanOptions,
        subdir: &Subdir,
        is_ancestor: &impl Fn(&Path) -> bool,
    ) -> Result<Option<PendingDir>, ScanError> {
        let text = subdir.name.to_string_lossy();
        let relative = self.relative.join(&subdir.name);

        let Some(filter) = self.filter.descend(&text) else {
            info_log!(Skip, 2, "filtered {}/", relative.display());
            return Ok(None);
        };
        let Some(node) = self.node.descend(&text) else {
            info_log!(Skip, 1, "ignored {}/", relative.display());
            return Ok(None);
        };

        let fs_path = self.fs_path.join(&subdir.name);
        if fs_path.join(&options.boundary_marker).exists() {
            info_log!(Skip, 1, "skipping nested repository {}/", relative.display());
            return Ok(None);
        }

        let canonical = if options.follow_symlinks {
            let canonical = fs::canonicalize(&fs_path)
                .map_err(|error| ScanError::canonicalize(fs_path.clone(), error))?;
            let loops = self.canonical.as_deref() == Some(canonical.as_path())
                || is_ancestor(&canonical);
            if subdir.symlink && loops {
                debug_log!(
                    Dup,
                    1,
                    "not following {} back into {}",
                    relative.display(),
                    canonical.display()
                );
                return Ok(None);
            }
            Some(canonical)
        } else {
            None
        };

        Ok(Some(PendingDir {
            fs_path,
            relative,
            canonical,
            node,
            filter,
        }))
    }
}

/// Depth-first iterator over the files a scan selects.
///
/// Within a directory, files come first in name order, then each
/// subdirectory in name order. The iterator ends after the first error.
#[derive(Debug)]
pub struct Scanner {
    options: ScanOptions,
    stack: Vec<DirectoryState>,
    finished: bool,
    directories: usize,
    files: usize,
}

impl Scanner {
    pub(crate) fn new(options: ScanOptions, root: PendingDir) -> Result<Self, ScanError> {
        let state = DirectoryState::open(&options, root)?;
        Ok(Self {
            options,
            stack: vec![state],
            finished: false,
            directories: 1,
            files: 0,
        })
    }

    fn fail(&mut self, error: ScanError) -> Option<Result<ScanEntry, ScanError>> {
        self.finished = true;
        self.stack.clear();
        Some(Err(error))
    }
}

impl Iterator for Scanner {
    type Item = Result<ScanEntry, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let Some(state) = self.stack.last_mut() else {
                self.finished = true;
                info_log!(
                    Stats,
                    1,
                    "scanned {} directories, selected {} files",
                    self.directories,
                    self.files
                );
                return None;
            };

            if let Some(entry) = state.next_file() {
                self.files += 1;
                return Some(Ok(entry));
            }

            let depth = self.stack.len() - 1;
            let (ancestors, current) = self.stack.split_at_mut(depth);
            let state = &mut current[0];
            let is_ancestor = |path: &Path| ancestors.iter().any(|dir| dir.canonical() == Some(path));
            let next = state.next_dir(&self.options, is_ancestor);
            match next {
                Some(Ok(pending)) => match DirectoryState::open(&self.options, pending) {
                    Ok(child) => {
                        self.directories += 1;
                        self.stack.push(child);
                    }
                    Err(error) => return self.fail(error),
                },
                Some(Err(error)) => return self.fail(error),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Unions the directory's ignore file and then its rule file onto `inherited`.
pub(crate) fn load_rules(
    options: &ScanOptions,
    dir: &Path,
    inherited: RuleNode,
) -> Result<RuleNode, ScanError> {
    let mut node = inherited;

    let ignore_path = dir.join(&options.ignore_file_name);
    if let Some(text) = read_optional(&ignore_path)? {
        let ignores = RuleNode::from_ignore_text(&text)
            .map_err(|error| ScanError::ignore_syntax(ignore_path.clone(), error))?;
        info_log!(Rules, 1, "loaded {}", ignore_path.display());
        node = node.union(&ignores);
    }

    let rules_path = dir.join(&options.rules_file_name);
    if let Some(text) = read_optional(&rules_path)? {
        let rules = RuleNode::read(&text)
            .map_err(|error| ScanError::rule_syntax(rules_path.clone(), error))?;
        info_log!(Rules, 1, "loaded {}", rules_path.display());
        debug_log!(Rules, 3, "{}:\n{rules}", rules_path.display());
        node = node.union(&rules);
    }

    Ok(node)
}

fn read_optional(path: &Path) -> Result<Option<String>, ScanError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(error) => Err(ScanError::read_rules(path.to_path_buf(), error)),
    }
}

/// Lists `dir`, returning sorted file names and sorted subdirectories.
///
/// The directory's own rule and ignore files are consumed, not listed.
fn list_directory(
    options: &ScanOptions,
    dir: &Path,
) -> Result<(Vec<OsString>, Vec<Subdir>), ScanError> {
    let mut files = Vec::new();
    let mut dirs = Vec::new();

    let read_dir = fs::read_dir(dir).map_err(|error| ScanError::read_dir(dir.to_path_buf(), error))?;
    for entry in read_dir {
        let entry = entry.map_err(|error| ScanError::read_dir_entry(dir.to_path_buf(), error))?;
        let file_type = entry
            .file_type()
            .map_err(|error| ScanError::metadata(entry.path(), error))?;
        let name = entry.file_name();
        let is_config = name == options.rules_file_name || name == options.ignore_file_name;

        if file_type.is_file() {
            if is_config {
                debug_log!(Scan, 2, "consumed {}", entry.path().display());
                continue;
            }
            files.push(name);
        } else if file_type.is_dir() {
            dirs.push(Subdir {
                name,
                symlink: false,
            });
        } else if file_type.is_symlink() {
            if !options.follow_symlinks {
                debug_log!(Scan, 2, "skipping symlink {}", entry.path().display());
                continue;
            }
            match fs::metadata(entry.path()) {
                Ok(target) if target.is_file() && !is_config => files.push(name),
                Ok(target) if target.is_dir() => dirs.push(Subdir {
                    name,
                    symlink: true,
                }),
                Ok(_) => {}
                Err(error) => {
                    debug_log!(Scan, 1, "dangling symlink {}: {error}", entry.path().display());
                }
            }
        }
    }

    files.sort();
    dirs.sort_by(|a, b| a.name.cmp(&b.name));
    Ok((files, dirs))
}
