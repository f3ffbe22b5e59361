#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `rules` parses headerfix rule files (`.header`) and resolves the settings
//! that apply to each path of a source tree. A rule file assigns values to a
//! fixed set of typed keys, either for its whole directory or inside `{ }`
//! blocks selected by `+`/`-` patterns:
//!
//! ```text
//! width = 80
//! {
//!     + *.h
//!     - *.yy.h
//!     guards
//! }
//! ```
//!
//! # Design
//!
//! - [`EnvKey`] enumerates the keys and their [`ValueType`]s; values are parsed
//!   into typed [`Value`]s up front so an unknown key or a bad value is a
//!   syntax error at load time, never a surprise during a scan.
//! - An [`Overlay`] is a partial assignment; an [`Environment`] is the full set
//!   of settings for one file, built by overlaying the defaults.
//! - A [`RuleNode`] is the parsed form of a rule or ignore file. It is
//!   resolved one path component at a time: [`RuleNode::descend`] derives the
//!   node for a subdirectory and [`RuleNode::effective_env`] the settings for
//!   a file. Nodes are immutable and share their blocks through
//!   [`Arc`](std::sync::Arc), so a derived node costs a few pointer copies.
//!
//! # Invariants
//!
//! - Every value stored in an [`Overlay`] has its key's type and range.
//! - Later assignments win: deeper directories over shallower ones, later
//!   blocks over earlier ones, and the right operand of [`RuleNode::union`].
//! - `guardname` is derived from the path unless a matching block assigns it.
//!
//! # Errors
//!
//! [`RuleNode::read`] returns [`RuleError`], which carries the line number and
//! a [`RuleErrorKind`]. Rejected assignments are reported as [`EnvError`] and
//! bad patterns as [`filters::PatternError`], both reachable through
//! [`std::error::Error::source`].
//!
//! # Examples
//!
//! ```
//! use rules::RuleNode;
//!
//! let rules = RuleNode::read("{\n+ /vendor/\nignore\n}\n{\n+ *.h\nguards\n}\n").unwrap();
//! let ignores = RuleNode::from_ignore_text("*.tmp\n").unwrap();
//! let root = ignores.union(&rules);
//!
//! assert!(root.descend("vendor").is_none());
//! assert!(root.effective_env("scratch.tmp").is_none());
//!
//! let src = root.descend("src").unwrap();
//! let env = src.effective_env("list.h").unwrap();
//! assert!(env.guards());
//! assert_eq!(env.guardname(), "SRC_LIST_H");
//! ```
//!
//! # See also
//!
//! - `filters` for the pattern language used inside blocks.
//! - `walk` for the scanner that loads rule files while descending.

mod env;
mod environment;
mod error;
mod lexer;
mod node;

pub use env::{
    EnvKey, Value, ValueType, dump_assignment, format_value, parse_assignment, parse_value,
    to_macro,
};
pub use environment::{Environment, Overlay};
pub use error::{EnvError, RuleError, RuleErrorKind};
pub use node::{Rule, RuleNode};
