#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` implements the verbosity flag system shared by the headerfix
//! crates. Diagnostics are grouped into [`InfoFlag`] and [`DebugFlag`]
//! categories, each with its own level, so a user can ask for
//! `--debug=filter2` without drowning in traversal noise.
//!
//! # Design
//!
//! - [`VerbosityConfig`] holds one level per flag. It is built from a `-v`
//!   count with [`VerbosityConfig::from_verbose_level`] and refined with
//!   `FLAG[N]` tokens.
//! - The active configuration and the collected [`DiagnosticEvent`]s live in
//!   thread-local storage. Library code records events with [`debug_log!`]
//!   and [`info_log!`]; front-ends call [`drain_events`] and decide where the
//!   text goes.
//! - With the `tracing` feature, [`HeaderfixLayer`] routes `tracing` events
//!   with `headerfix::<flag>` targets into the same buffer.
//!
//! # Invariants
//!
//! - A message is formatted only when its flag level passes.
//! - Events are drained in emission order.
//!
//! # Examples
//!
//! ```
//! use logging::{drain_events, info_log, init, VerbosityConfig};
//!
//! init(VerbosityConfig::from_verbose_level(1));
//! info_log!(Rules, 1, "loaded {}", "src/.header");
//!
//! let events = drain_events();
//! assert_eq!(events[0].to_string(), "[rules] loaded src/.header");
//! ```

mod config;
mod levels;
mod macros;
mod thread_local;
#[cfg(feature = "tracing")]
mod tracing_bridge;

pub use config::VerbosityConfig;
pub use levels::{DebugFlag, DebugLevels, InfoFlag, InfoLevels};
pub use thread_local::{
    DiagnosticEvent, apply_debug_flag, apply_info_flag, current_config, debug_gte, drain_events,
    emit_debug, emit_info, info_gte, init, replay_events,
};
#[cfg(feature = "tracing")]
pub use tracing_bridge::{HeaderfixLayer, TARGET_PREFIX, init_tracing, init_tracing_with_filter};
