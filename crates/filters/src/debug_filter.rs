//! Tracing probes for pattern evaluation.
//!
//! All probes are compiled behind the `tracing` feature and collapse into
//! inline no-ops without it. Events use the `headerfix::filter` target, which
//! the `logging` bridge maps onto the `filter` debug flag.
//!
//! ```rust,ignore
//! use filters::debug_filter::trace_directory_verdict;
//!
//! trace_directory_verdict("build", &"build/", true);
//! ```

use std::fmt::Display;

/// Target name for tracing events.
#[cfg(feature = "tracing")]
const FILTER_TARGET: &str = "headerfix::filter";

/// Traces a pattern added to a set while parsing ignore-file or rule text.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_pattern_parsed(pattern: &impl Display, positive: bool, directory_only: bool) {
    tracing::trace!(
        target: FILTER_TARGET,
        pattern = %pattern,
        positive = positive,
        directory_only = directory_only,
        "pattern_parsed"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_pattern_parsed(_pattern: &impl Display, _positive: bool, _directory_only: bool) {}

/// Traces a pattern that fully matched a directory while descending.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_directory_verdict(directory: &str, pattern: &impl Display, positive: bool) {
    tracing::debug!(
        target: FILTER_TARGET,
        directory = %directory,
        pattern = %pattern,
        positive = positive,
        "directory_verdict"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_directory_verdict(_directory: &str, _pattern: &impl Display, _positive: bool) {}

/// Traces a pattern that flipped the verdict for a file.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_file_verdict(file: &str, pattern: &impl Display, positive: bool) {
    tracing::trace!(
        target: FILTER_TARGET,
        file = %file,
        pattern = %pattern,
        positive = positive,
        "file_verdict"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_file_verdict(_file: &str, _pattern: &impl Display, _positive: bool) {}

/// Traces the size of a set parsed from an ignore file.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_ignore_file_parsed(pattern_count: usize, dropped_negations: usize) {
    tracing::debug!(
        target: FILTER_TARGET,
        pattern_count = pattern_count,
        dropped_negations = dropped_negations,
        "ignore_file_parsed"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_ignore_file_parsed(_pattern_count: usize, _dropped_negations: usize) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probes_are_callable_without_subscriber() {
        trace_pattern_parsed(&"*.tmp", true, false);
        trace_directory_verdict("build", &"build/", true);
        trace_file_verdict("a.c", &"*.c", true);
        trace_ignore_file_parsed(3, 1);
    }
}
