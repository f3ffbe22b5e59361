//! Turns path operands into a scan root and include filter.
//!
//! The root is the top of the git work tree containing the first operand.
//! Outside a work tree the first operand's directory is scanned directly.
//! When every operand names something below the root, each becomes a rooted
//! literal include; an operand naming the root itself lifts the filter.

use std::fs;
use std::path::{Component, Path, PathBuf};

use filters::{PathPattern, PatternEntry, PatternSet};
use logging::debug_log;
use walk::git;

use crate::failure::Failure;

/// Where a scan starts and what it is restricted to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ScanTarget {
    pub(crate) root: PathBuf,
    pub(crate) includes: Option<PatternSet>,
}

/// Resolves `operands` relative to `cwd`.
pub(crate) fn resolve(operands: &[PathBuf], cwd: &Path) -> Result<ScanTarget, Failure> {
    let fallback = [PathBuf::from(".")];
    let operands = if operands.is_empty() {
        &fallback[..]
    } else {
        operands
    };

    let resolved = operands
        .iter()
        .map(|operand| {
            let path = cwd.join(operand);
            fs::canonicalize(&path).map_err(|source| Failure::Operand { path, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let root = find_root(&resolved[0]);
    let mut components = Vec::with_capacity(resolved.len());
    for (operand, path) in operands.iter().zip(&resolved) {
        let relative = path
            .strip_prefix(&root)
            .map_err(|_| Failure::OutsideRoot {
                path: operand.clone(),
            })?;
        components.push(path_components(relative));
    }

    let includes = if components.iter().all(|parts| !parts.is_empty()) {
        let entries = components
            .into_iter()
            .map(|parts| PathPattern::literal(parts).map(PatternEntry::positive))
            .collect::<Result<Vec<_>, _>>()?;
        Some(PatternSet::new(entries))
    } else {
        None
    };

    Ok(ScanTarget { root, includes })
}

fn find_root(first: &Path) -> PathBuf {
    let dir = if first.is_dir() {
        first
    } else {
        first.parent().unwrap_or(first)
    };
    match git::repository_root(dir) {
        Ok(root) => fs::canonicalize(&root).unwrap_or(root),
        Err(error) => {
            debug_log!(Cmd, 1, "{error}; scanning {} directly", dir.display());
            dir.to_path_buf()
        }
    }
}

fn path_components(relative: &Path) -> Vec<String> {
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_support::FileTree;

    #[test]
    fn no_operands_scans_the_working_directory() {
        let dir = FileTree::new()
            .file("a.c", "")
            .outside_repository()
            .create()
            .expect("tree");
        let target = resolve(&[], dir.path()).expect("resolve");
        assert_eq!(target.root, fs::canonicalize(dir.path()).expect("canonical"));
        assert!(target.includes.is_none());
    }

    #[test]
    fn file_operands_become_literal_includes() {
        let dir = FileTree::new()
            .files(["src/a.c", "src/b.c"])
            .outside_repository()
            .create()
            .expect("tree");
        let target = resolve(
            &[PathBuf::from("src/a.c"), PathBuf::from("src/b.c")],
            dir.path(),
        )
        .expect("resolve");
        assert_eq!(target.root, fs::canonicalize(dir.join("src")).expect("canonical"));
        let includes = target.includes.expect("includes");
        assert_eq!(includes.to_string(), "+ /a.c\n+ /b.c");
        assert!(includes.matches_file("a.c"));
        assert!(!includes.matches_file("c.c"));
    }

    #[test]
    fn missing_operand_is_reported() {
        let dir = FileTree::new().create().expect("tree");
        let error = resolve(&[PathBuf::from("missing.c")], dir.path()).expect_err("missing");
        assert!(matches!(error, Failure::Operand { .. }));
        assert!(error.to_string().starts_with("cannot access '"));
    }

    #[test]
    fn operand_outside_the_root_is_rejected() {
        let dir = FileTree::new()
            .files(["one/a.c", "two/b.c"])
            .outside_repository()
            .create()
            .expect("tree");
        let error = resolve(
            &[PathBuf::from("one/a.c"), PathBuf::from("two/b.c")],
            dir.path(),
        )
        .expect_err("outside root");
        assert!(matches!(error, Failure::OutsideRoot { .. }));
        assert_eq!(
            error.to_string(),
            "path not contained in repository: two/b.c"
        );
    }

    #[test]
    fn components_skip_current_dir_markers() {
        assert_eq!(
            path_components(Path::new("./src/lib/util.c")),
            ["src", "lib", "util.c"]
        );
        assert!(path_components(Path::new("")).is_empty());
    }
}
