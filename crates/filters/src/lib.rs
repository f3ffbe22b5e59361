#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `filters` provides the gitignore-style path patterns used by headerfix to
//! decide which files and directories a rule applies to. Patterns honour
//! rooted matches (leading `/`), directory-only patterns (trailing `/`) and
//! negation (`!` in ignore files, `-` in rule files). Evaluation is last match
//! wins: the final matching entry of a [`PatternSet`] decides.
//!
//! # Design
//!
//! - [`PathPattern`] is a tagged variant, [`Rooted`](PathPattern::Rooted) or
//!   [`Unrooted`](PathPattern::Unrooted), over a shared list of glob segments
//!   compiled with [`globset`]. Each segment matches exactly one path
//!   component.
//! - Matching is incremental. [`PatternSet::descend`] consumes one directory
//!   name and returns a verdict for that directory plus a narrower set for its
//!   contents: rooted patterns lose their first segment, unrooted patterns are
//!   carried unchanged so they are retried at every depth. A scanner therefore
//!   never re-matches a full path string.
//! - Sets are immutable and cheap to clone, so a narrowed set can be handed to
//!   another thread without synchronisation.
//!
//! # Invariants
//!
//! - A pattern always keeps at least one segment; a directory-only pattern
//!   ends with an empty marker segment that never matches a name.
//! - A narrowed set only contains patterns that can still match below the
//!   directory that produced it.
//! - A set never starts with a negative entry.
//!
//! # Errors
//!
//! [`PathPattern::parse`] reports [`PatternError`] for empty patterns and
//! components that are not valid globs. [`PatternSet::from_ignore_text`]
//! wraps it in [`IgnoreFileError`] with the offending line number.
//!
//! # Examples
//!
//! ```
//! use filters::PatternSet;
//!
//! let set = PatternSet::from_ignore_text("build/\n*.o\n!keep.o\n").unwrap();
//!
//! assert!(set.matches_path("build/out.bin"));
//! assert!(set.matches_path("src/lib.o"));
//! assert!(!set.matches_path("src/keep.o"));
//! assert!(!set.matches_path("build"));
//! ```
//!
//! # See also
//!
//! - `rules` guards each scoped rule block with a [`PatternSet`].
//! - [`globset`] for the glob matching primitives used internally.

pub mod debug_filter;
mod error;
mod pattern;
mod polarity;
mod set;

pub use error::{IgnoreFileError, PatternError};
pub use pattern::{DirectoryMatch, PathPattern, Segments};
pub use polarity::Polarity;
pub use set::{PatternEntry, PatternSet};
