//! Verbosity setup and delivery of collected diagnostics.
//!
//! Library crates record events through the `logging` macros and through
//! `tracing` events with `headerfix::<flag>` targets. The `HEADERFIX_LOG`
//! environment variable holds an [`EnvFilter`] directive that can further
//! restrict which `tracing` events reach the flag system.

use std::io::Write;

use logging::{VerbosityConfig, drain_events, init_tracing_with_filter};
use tracing_subscriber::EnvFilter;

use crate::arguments::ParsedArgs;
use crate::failure::Failure;

/// Environment variable holding the `tracing` filter directive.
pub(crate) const LOG_ENV: &str = "HEADERFIX_LOG";

const DEFAULT_DIRECTIVE: &str = "headerfix=trace";

/// Builds the verbosity configuration requested on the command line.
pub(crate) fn verbosity(parsed: &ParsedArgs) -> Result<VerbosityConfig, Failure> {
    let mut config = VerbosityConfig::from_verbose_level(parsed.verbose);
    for token in parsed.info.iter().flat_map(|list| list.split(',')) {
        let token = token.trim();
        if !token.is_empty() {
            config.apply_info_flag(token).map_err(Failure::Verbosity)?;
        }
    }
    for list in &parsed.debug {
        config.apply_debug_flags(list).map_err(Failure::Verbosity)?;
    }
    Ok(config)
}

/// Applies the requested verbosity to the current thread and makes sure a
/// `tracing` subscriber forwards events into it.
pub(crate) fn install(parsed: &ParsedArgs) -> Result<(), Failure> {
    let config = verbosity(parsed)?;
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    // A subscriber installed by an earlier run stays in place.
    let _ = init_tracing_with_filter(config.clone(), filter);
    logging::init(config);
    drain_events();
    tracing::debug!(target: "headerfix::cmd", "verbosity: {} -v", parsed.verbose);
    Ok(())
}

/// Writes every collected event to `stderr`, one per line.
pub(crate) fn flush<W: Write>(stderr: &mut W) {
    for event in drain_events() {
        let _ = writeln!(stderr, "{event}");
    }
}
