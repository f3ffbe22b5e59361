//! crates/logging/src/macros.rs
//! Level-gated logging macros.

/// Record a debug diagnostic when the named [`DebugFlag`](crate::DebugFlag)
/// is at or above `level` on the current thread.
///
/// The message is only formatted when the level check passes.
///
/// ```
/// use logging::{debug_log, drain_events, init, VerbosityConfig};
///
/// let mut config = VerbosityConfig::default();
/// config.debug.filter = 2;
/// init(config);
///
/// debug_log!(Filter, 2, "pattern {} matched {}", "*.c", "a.c");
/// debug_log!(Filter, 3, "too chatty");
///
/// let events = drain_events();
/// assert_eq!(events.len(), 1);
/// assert_eq!(events[0].message(), "pattern *.c matched a.c");
/// ```
#[macro_export]
macro_rules! debug_log {
    ($flag:ident, $level:expr, $($arg:tt)+) => {
        if $crate::debug_gte($crate::DebugFlag::$flag, $level) {
            $crate::emit_debug($crate::DebugFlag::$flag, $level, ::std::format!($($arg)+));
        }
    };
}

/// Record an info diagnostic when the named [`InfoFlag`](crate::InfoFlag)
/// is at or above `level` on the current thread.
#[macro_export]
macro_rules! info_log {
    ($flag:ident, $level:expr, $($arg:tt)+) => {
        if $crate::info_gte($crate::InfoFlag::$flag, $level) {
            $crate::emit_info($crate::InfoFlag::$flag, $level, ::std::format!($($arg)+));
        }
    };
}
