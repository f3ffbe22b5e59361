#![deny(unsafe_code)]
#![deny(missing_docs)]

//! Temporary source trees for headerfix tests.
//!
//! [`TestDir`] owns a temporary directory that is removed on drop.
//! [`FileTree`] describes files and directories declaratively and writes them
//! under a root in one call:
//!
//! ```
//! use test_support::{FileTree, TestDir};
//!
//! let dir = TestDir::new().unwrap();
//! FileTree::new()
//!     .file(".header", "{\n+ *.c\nguards\n}\n")
//!     .file("sub/a.c", "int a;\n")
//!     .dir("empty")
//!     .create_in(dir.path())
//!     .unwrap();
//!
//! assert!(dir.path().join("sub/a.c").is_file());
//! assert!(dir.path().join("empty").is_dir());
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A temporary directory removed when dropped.
#[derive(Debug)]
pub struct TestDir {
    inner: tempfile::TempDir,
}

impl TestDir {
    /// Creates a fresh, empty directory.
    pub fn new() -> io::Result<Self> {
        let inner = tempfile::Builder::new().prefix("headerfix-").tempdir()?;
        Ok(Self { inner })
    }

    /// Root of the directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// `relative` resolved against the root.
    #[must_use]
    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.inner.path().join(relative)
    }

    /// Writes `contents` to `relative`, creating parent directories.
    pub fn write(&self, relative: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> io::Result<PathBuf> {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// Creates the directory `relative` and its parents.
    pub fn mkdir(&self, relative: impl AsRef<Path>) -> io::Result<PathBuf> {
        let path = self.join(relative);
        fs::create_dir_all(&path)?;
        Ok(path)
    }

    /// Creates a symbolic link at `relative` pointing to `target`.
    #[cfg(unix)]
    pub fn symlink(&self, target: impl AsRef<Path>, relative: impl AsRef<Path>) -> io::Result<PathBuf> {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        std::os::unix::fs::symlink(target, &path)?;
        Ok(path)
    }
}

#[derive(Clone, Debug)]
enum Node {
    File(PathBuf, Vec<u8>),
    Dir(PathBuf),
    #[cfg(unix)]
    Symlink(PathBuf, PathBuf),
}

/// Declarative description of a directory tree.
///
/// Paths are relative and use `/` separators. Parent directories are created
/// as needed, and entries are written in the order they were added.
#[derive(Clone, Debug, Default)]
pub struct FileTree {
    nodes: Vec<Node>,
}

impl FileTree {
    /// An empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with `contents`.
    #[must_use]
    pub fn file(mut self, path: impl Into<PathBuf>, contents: impl AsRef<[u8]>) -> Self {
        self.nodes
            .push(Node::File(path.into(), contents.as_ref().to_vec()));
        self
    }

    /// Adds an empty file for each path.
    #[must_use]
    pub fn files<I, P>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        paths
            .into_iter()
            .fold(self, |tree, path| tree.file(path, b""))
    }

    /// Adds a `.git` file that is not a valid gitfile.
    ///
    /// git commands run inside the tree then fail instead of discovering an
    /// enclosing work tree, whatever directory the tree was created in.
    #[must_use]
    pub fn outside_repository(self) -> Self {
        self.file(".git", "not a repository\n")
    }

    /// Adds a directory.
    #[must_use]
    pub fn dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.nodes.push(Node::Dir(path.into()));
        self
    }

    /// Adds a symbolic link at `path` pointing to `target`.
    #[cfg(unix)]
    #[must_use]
    pub fn symlink(mut self, path: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        self.nodes.push(Node::Symlink(path.into(), target.into()));
        self
    }

    /// Writes the tree under `root`.
    pub fn create_in(&self, root: &Path) -> io::Result<()> {
        for node in &self.nodes {
            match node {
                Node::File(path, contents) => {
                    let full = root.join(path);
                    if let Some(parent) = full.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    fs::write(full, contents)?;
                }
                Node::Dir(path) => fs::create_dir_all(root.join(path))?,
                #[cfg(unix)]
                Node::Symlink(path, target) => {
                    let full = root.join(path);
                    if let Some(parent) = full.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    std::os::unix::fs::symlink(target, full)?;
                }
            }
        }
        Ok(())
    }

    /// Writes the tree into a new [`TestDir`].
    pub fn create(&self) -> io::Result<TestDir> {
        let dir = TestDir::new()?;
        self.create_in(dir.path())?;
        Ok(dir)
    }
}
