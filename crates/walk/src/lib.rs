#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `walk` scans a source tree and yields every file that headerfix should
//! look at, together with the settings that apply to it. While descending it
//! reads each directory's ignore file (`.gitignore`) and rule file
//! (`.header`), so rules written deep in the tree only affect the paths
//! below them.
//!
//! # Design
//!
//! - [`ScanBuilder`] configures the scan: file names, the nested repository
//!   marker, symlink handling, include and exclude patterns, base rules, and a
//!   global ignore file.
//! - [`Scanner`] implements [`Iterator`] over a stack of open directories.
//!   Each level holds the [`RuleNode`](rules::RuleNode) and [`PathFilter`]
//!   narrowed for that directory, so no path is ever re-matched from the root.
//! - With the `parallel` feature, [`ScanBuilder::scan_parallel`] fans the
//!   recursion out over rayon and returns the same entries in the same order.
//! - [`git`] asks the `git` tool for the global ignore file and the
//!   repository root.
//!
//! # Invariants
//!
//! - Entries are deterministic: within a directory, files in name order come
//!   first, then subdirectories in name order.
//! - An ignored or excluded directory is never listed; nothing below it can be
//!   brought back.
//! - The rule and ignore files a directory contributes are consumed, never
//!   yielded as entries.
//! - A subdirectory containing the boundary marker is not entered.
//! - With symlink following on, a link back into a directory the scan is
//!   already inside is skipped.
//!
//! # Errors
//!
//! Missing rule and ignore files are skipped. Any other failure to read them,
//! a syntax error in them, or an I/O error while listing ends the scan with a
//! [`ScanError`] naming the offending path.
//!
//! # Examples
//!
//! ```
//! use walk::ScanBuilder;
//! use std::fs;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! let root = temp.path();
//! fs::write(root.join(".header"), "{\n+ /*.c\nguards = true\n}\n")?;
//! fs::write(root.join("a.c"), "")?;
//! fs::create_dir(root.join("sub"))?;
//! fs::write(root.join("sub/.gitignore"), "*.tmp\n")?;
//! fs::write(root.join("sub/b.c"), "")?;
//! fs::write(root.join("sub/b.tmp"), "")?;
//!
//! let mut seen = Vec::new();
//! for entry in ScanBuilder::new(root).build()? {
//!     let entry = entry?;
//!     seen.push((entry.relative_path().to_path_buf(), entry.env().guards()));
//! }
//!
//! let names: Vec<_> = seen.iter().map(|(path, _)| path.to_str().unwrap()).collect();
//! assert_eq!(names, ["a.c", "sub/b.c"]);
//! assert!(seen[0].1);
//! assert!(!seen[1].1);
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```
//!
//! # See also
//!
//! - `rules` for the rule-file language and resolution.
//! - `filters` for the pattern language.

mod builder;
mod entry;
mod error;
mod filter;
pub mod git;
#[cfg(feature = "parallel")]
mod parallel;
mod scanner;

pub use builder::ScanBuilder;
pub use entry::ScanEntry;
pub use error::{GitError, ScanError, ScanErrorKind};
pub use filter::PathFilter;
pub use scanner::Scanner;

#[cfg(test)]
mod tests;
