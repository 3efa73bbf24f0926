#![deny(missing_docs)]
//! Shared logging utilities for the monitor workspace.
//!
//! This crate provides the `monitor_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Records emitted while
//! a polling session is ticking are tagged with the current tick number.

use std::cell::Cell;
use std::sync::Once;

#[doc(hidden)]
pub use log;

thread_local! {
    /// Thread-local storage for the current poll tick.
    static POLL_TICK: Cell<u64> = const { Cell::new(0) };
}

/// Sets the poll tick for the current thread; 0 means "not polling".
///
/// Async code shares one thread between many tasks, so prefer
/// [`with_poll_tick`], which never leaves the tag set across an await.
pub fn set_poll_tick(tick: u64) {
    POLL_TICK.with(|v| v.set(tick));
}

/// Runs `f` with the poll tick set to `tick`, then restores the previous tag.
pub fn with_poll_tick<R>(tick: u64, f: impl FnOnce() -> R) -> R {
    let previous = POLL_TICK.with(|v| v.replace(tick));
    let result = f();
    POLL_TICK.with(|v| v.set(previous));
    result
}

/// Retrieves the poll tick for the current thread.
/// Returns 0 if no polling session has ticked yet.
pub fn get_poll_tick() -> u64 {
    POLL_TICK.with(|v| v.get())
}

#[doc(hidden)]
#[macro_export]
macro_rules! __monitor_log {
    ($level:expr, $($arg:tt)*) => {{
        match $crate::get_poll_tick() {
            0 => $crate::log::log!($level, $($arg)*),
            tick => $crate::log::log!($level, "[tick {}] {}", tick, format_args!($($arg)*)),
        }
    }};
}

/// Logs a trace-level message, tagged with the current poll tick.
#[macro_export]
macro_rules! monitor_trace {
    ($($arg:tt)*) => {{
        $crate::__monitor_log!($crate::log::Level::Trace, $($arg)*);
    }};
}

/// Logs a debug-level message, tagged with the current poll tick.
#[macro_export]
macro_rules! monitor_debug {
    ($($arg:tt)*) => {{
        $crate::__monitor_log!($crate::log::Level::Debug, $($arg)*);
    }};
}

/// Logs an info-level message, tagged with the current poll tick.
#[macro_export]
macro_rules! monitor_info {
    ($($arg:tt)*) => {{
        $crate::__monitor_log!($crate::log::Level::Info, $($arg)*);
    }};
}

/// Logs a warn-level message, tagged with the current poll tick.
#[macro_export]
macro_rules! monitor_warn {
    ($($arg:tt)*) => {{
        $crate::__monitor_log!($crate::log::Level::Warn, $($arg)*);
    }};
}

/// Logs an error-level message, tagged with the current poll tick.
#[macro_export]
macro_rules! monitor_error {
    ($($arg:tt)*) => {{
        $crate::__monitor_log!($crate::log::Level::Error, $($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// Safe to call from every test: only the first call installs a logger, and
/// an already-installed logger is left alone.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    static INIT: Once = Once::new();
    INIT.call_once(|| {
        // Use debug level in debug builds, info in release builds.
        let level = if cfg!(debug_assertions) {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };

        let _ = CombinedLogger::init(vec![TermLogger::new(
            level,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        )]);
    });
}
