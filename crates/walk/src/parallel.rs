//! Directory-level parallel scanning using rayon.
//!
//! Every subdirectory is scanned as its own rayon task. A task receives the
//! parent's narrowed [`RuleNode`](rules::RuleNode) and filter by value, so
//! workers share nothing mutable. Results are stitched back together in the
//! order the sequential [`Scanner`](crate::Scanner) produces them.
//!
//! Diagnostics recorded through the `logging` macros are thread-local; each
//! task runs under the caller's verbosity configuration and its events are
//! replayed onto the caller's thread in scan order.

use std::path::PathBuf;

use logging::{DiagnosticEvent, VerbosityConfig, drain_events, info_log, init, replay_events};
use rayon::prelude::*;

use crate::builder::{ScanBuilder, ScanOptions};
use crate::entry::ScanEntry;
use crate::error::ScanError;
use crate::scanner::{DirectoryState, PendingDir};

impl ScanBuilder {
    /// Scans the tree on the rayon thread pool and collects every entry.
    ///
    /// The entries are identical to, and in the same order as, those of the
    /// sequential [`Scanner`](crate::Scanner).
    ///
    /// # Errors
    ///
    /// Returns the error the sequential scan would have stopped at. Entries
    /// found before it are discarded.
    pub fn scan_parallel(self) -> Result<Vec<ScanEntry>, ScanError> {
        let (options, root) = self.prepare()?;
        let config = logging::current_config();

        let mut events = drain_events();
        let (result, scanned) = scan_tree(&options, root, &[], &config);
        events.extend(scanned);
        replay_events(events);

        let entries = result?;
        info_log!(Stats, 1, "selected {} files", entries.len());
        Ok(entries)
    }
}

/// Scans one directory and, in parallel, everything below it.
///
/// Returns the entries together with the diagnostics recorded while
/// producing them, in scan order.
fn scan_tree(
    options: &ScanOptions,
    pending: PendingDir,
    ancestors: &[PathBuf],
    config: &VerbosityConfig,
) -> (Result<Vec<ScanEntry>, ScanError>, Vec<DiagnosticEvent>) {
    let result = list_level(options, pending, ancestors);
    let mut events = drain_events();
    let (mut entries, children, chain) = match result {
        Ok(level) => level,
        Err(error) => return (Err(error), events),
    };

    let results: Vec<_> = children
        .into_par_iter()
        .map(|child| {
            init(config.clone());
            scan_tree(options, child, &chain, config)
        })
        .collect();

    for (result, child_events) in results {
        events.extend(child_events);
        match result {
            Ok(found) => entries.extend(found),
            Err(error) => return (Err(error), events),
        }
    }
    (Ok(entries), events)
}

type Level = (Vec<ScanEntry>, Vec<PendingDir>, Vec<PathBuf>);

/// Opens a directory and returns its files, the subdirectories to enter and
/// the canonical ancestor chain for them.
fn list_level(
    options: &ScanOptions,
    pending: PendingDir,
    ancestors: &[PathBuf],
) -> Result<Level, ScanError> {
    let mut state = DirectoryState::open(options, pending)?;
    let files = state.drain_files();
    let dirs = state.drain_dirs(options, |path| ancestors.iter().any(|dir| dir == path))?;

    let mut chain = ancestors.to_vec();
    chain.extend(state.canonical().map(PathBuf::from));
    Ok((files, dirs, chain))
}
