//! Queries answered by the `git` command line tool.
//!
//! Both helpers shell out to `git` in the same way a user would, so they
//! honour the user's configuration and environment.

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use logging::debug_log;

use crate::error::GitError;

fn run_git(command: &'static str, args: &[&str], cwd: Option<&Path>) -> Result<Output, GitError> {
    let mut cmd = Command::new("git");
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    debug_log!(Cmd, 1, "git {}", args.join(" "));

    let output = cmd.output().map_err(|source| GitError::Spawn { source })?;
    if !output.status.success() {
        return Err(GitError::Failed {
            command,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        });
    }
    Ok(output)
}

/// The user's global ignore file, from `core.excludesfile` in the global git
/// configuration.
///
/// Returns `None` when git is unavailable or the setting is absent. A leading
/// `~` is expanded with `$HOME`.
#[must_use]
pub fn global_excludes_file() -> Option<PathBuf> {
    let output = match run_git(
        "config",
        &["config", "--global", "--null", "--get", "core.excludesfile"],
        None,
    ) {
        Ok(output) => output,
        Err(error) => {
            debug_log!(Cmd, 1, "no global excludes file: {error}");
            return None;
        }
    };
    let value = parse_null_terminated(&output.stdout)?;
    Some(expand_home(value, env::var_os("HOME").as_deref()))
}

/// Top-level directory of the repository containing `path`.
///
/// `path` may be a file; its parent directory is used then.
///
/// # Errors
///
/// Returns [`GitError`] when git cannot be run or `path` is not inside a
/// repository.
pub fn repository_root(path: &Path) -> Result<PathBuf, GitError> {
    let dir = if path.is_dir() {
        path
    } else {
        path.parent().filter(|parent| !parent.as_os_str().is_empty()).unwrap_or(Path::new("."))
    };
    let output = run_git("rev-parse", &["rev-parse", "--show-toplevel"], Some(dir))?;
    let text = String::from_utf8(output.stdout)
        .map_err(|_| GitError::InvalidOutput { command: "rev-parse" })?;
    let root = text.trim_end_matches(['\n', '\r']);
    if root.is_empty() {
        return Err(GitError::InvalidOutput { command: "rev-parse" });
    }
    Ok(PathBuf::from(root))
}

/// The text before the first NUL, or `None` when there is none or it is empty.
fn parse_null_terminated(stdout: &[u8]) -> Option<&str> {
    let end = stdout.iter().position(|&byte| byte == 0)?;
    let value = std::str::from_utf8(&stdout[..end]).ok()?;
    (!value.is_empty()).then_some(value)
}

/// Expands `~` and `~/...` against `home`.
fn expand_home(value: &str, home: Option<&OsStr>) -> PathBuf {
    match (value, home) {
        ("~", Some(home)) => PathBuf::from(home),
        (_, Some(home)) if value.starts_with("~/") => Path::new(home).join(&value[2..]),
        _ => PathBuf::from(value),
    }
}
