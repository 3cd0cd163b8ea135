//! Shared macros for the codebase
//!
//! Per-step tracing inside the enumeration hot loops. The macros expand to
//! nothing unless the `trace` feature is enabled, so odometer steps and
//! backtracking frames cost nothing in normal builds.

/// Per-step trace event - no-op when the trace feature is disabled
#[cfg(not(feature = "trace"))]
#[macro_export]
macro_rules! trace_step {
    ($($arg:tt)*) => {};
}

/// Per-step trace event - forwards to `tracing::trace!`
#[cfg(feature = "trace")]
#[macro_export]
macro_rules! trace_step {
    ($($arg:tt)*) => {
        ::tracing::trace!($($arg)*)
    };
}
