//! crates/logging/src/tracing_bridge.rs
//! Bridge between the tracing crate and the verbosity flag system.
//!
//! Events whose target ends in a flag name (`headerfix::rules`,
//! `headerfix::filter`, ...) are routed into the thread-local event buffer
//! when the matching flag is enabled. `ERROR`/`WARN`/`INFO` events prefer the
//! info flag of that name; `DEBUG` and `TRACE` events use the debug flag at
//! levels 1 and 2.
//!
//! ```rust,ignore
//! use logging::{VerbosityConfig, init_tracing};
//!
//! init_tracing(VerbosityConfig::from_verbose_level(3));
//! tracing::debug!(target: "headerfix::filter", "pattern matched");
//! ```

use super::config::VerbosityConfig;
use super::levels::{DebugFlag, InfoFlag};
use super::thread_local::{debug_gte, emit_debug, emit_info, info_gte};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// Target prefix used by every crate in the workspace.
pub const TARGET_PREFIX: &str = "headerfix";

/// A tracing layer that forwards events into the verbosity flag system.
pub struct HeaderfixLayer {
    _config: VerbosityConfig,
}

impl HeaderfixLayer {
    /// Create a new layer for the given verbosity configuration.
    #[must_use]
    pub const fn new(config: VerbosityConfig) -> Self {
        Self { _config: config }
    }

    fn flag_name(target: &str) -> &str {
        target.rsplit("::").next().unwrap_or(target)
    }

    fn target_to_info_flag(target: &str) -> Option<InfoFlag> {
        let name = Self::flag_name(target);
        InfoFlag::ALL.into_iter().find(|flag| flag.name() == name)
    }

    fn target_to_debug_flag(target: &str) -> Option<DebugFlag> {
        let name = Self::flag_name(target);
        DebugFlag::ALL.into_iter().find(|flag| flag.name() == name)
    }

    /// Debug level an event of this tracing level is recorded at.
    const fn level_to_debug_level(level: &Level) -> u8 {
        match *level {
            Level::ERROR | Level::WARN | Level::INFO | Level::DEBUG => 1,
            Level::TRACE => 2,
        }
    }

    const fn is_info_level(level: &Level) -> bool {
        matches!(*level, Level::ERROR | Level::WARN | Level::INFO)
    }
}

impl<S> Layer<S> for HeaderfixLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();
        let level = metadata.level();

        if Self::is_info_level(level) {
            if let Some(info_flag) = Self::target_to_info_flag(target) {
                if info_gte(info_flag, 1) {
                    let mut visitor = MessageVisitor::default();
                    event.record(&mut visitor);
                    if let Some(message) = visitor.message {
                        emit_info(info_flag, 1, message);
                    }
                }
                return;
            }
        }

        if let Some(debug_flag) = Self::target_to_debug_flag(target) {
            let debug_level = Self::level_to_debug_level(level);
            if debug_gte(debug_flag, debug_level) {
                let mut visitor = MessageVisitor::default();
                event.record(&mut visitor);
                if let Some(message) = visitor.message {
                    emit_debug(debug_flag, debug_level, message);
                }
            }
        }
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_owned());
        }
    }
}

/// Install a global subscriber that forwards `headerfix::*` events into the
/// verbosity system, and apply `config` to the current thread.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_tracing(config: VerbosityConfig) -> bool {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    super::thread_local::init(config.clone());

    let layer = HeaderfixLayer::new(config);

    tracing_subscriber::registry().with(layer).try_init().is_ok()
}

/// Like [`init_tracing`], with an extra filter layer (typically an
/// [`EnvFilter`](tracing_subscriber::EnvFilter)) in front of the bridge.
pub fn init_tracing_with_filter<F>(config: VerbosityConfig, filter: F) -> bool
where
    F: Layer<tracing_subscriber::Registry> + Send + Sync + 'static,
{
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    super::thread_local::init(config.clone());

    let layer = HeaderfixLayer::new(config);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .is_ok()
}
