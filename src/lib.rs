#![deny(unsafe_code)]
#![deny(missing_docs)]

//! # Overview
//!
//! `headerfix` decides, for every file in a source tree, which header
//! normalization settings apply to it. Nested `.gitignore` files hide paths,
//! and nested `.header` rule files scope settings such as include guards,
//! line width and copyright text to the directories and file patterns they
//! name.
//!
//! This crate re-exports the workspace crates under one roof:
//!
//! - [`filters`]: gitignore-style patterns matched one path component at a
//!   time.
//! - [`rules`]: the rule-file language, typed settings and rule resolution.
//! - [`walk`]: the scanner that reads rule files while descending.
//! - [`logging`]: the verbosity flags used for diagnostics.
//! - [`cli`]: the `header-scan` front-end.
//!
//! # Examples
//!
//! ```
//! use headerfix::walk::ScanBuilder;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! std::fs::write(temp.path().join(".header"), "{\n+ *.h\nguards\nwidth = 80\n}\n")?;
//! std::fs::write(temp.path().join("util.h"), "")?;
//! std::fs::write(temp.path().join("util.c"), "")?;
//!
//! for entry in ScanBuilder::new(temp.path()).build()? {
//!     let entry = entry?;
//!     let is_header = entry.relative_path().extension().is_some_and(|ext| ext == "h");
//!     assert_eq!(entry.env().guards(), is_header);
//! }
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

pub use cli;
pub use filters;
pub use logging;
pub use rules;
pub use walk;

pub use filters::{PathPattern, PatternSet};
pub use rules::{EnvKey, Environment, RuleNode, Value};
pub use walk::{ScanBuilder, ScanEntry, ScanError, Scanner};
