//! Logging and tracing facilities for Horizon Select.
//!
//! Horizon Select uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! Every subsystem logs under its own target (see [`targets`]), so a filter
//! such as `RUST_LOG=horizon_select::selection=debug` isolates selection
//! changes.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "horizon_select_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_select_core::signal";
    /// Deferred value pipeline target.
    pub const DEFERRED: &str = "horizon_select_core::deferred";
    /// Widget-level events (mount, dispatch, configuration).
    pub const WIDGET: &str = "horizon_select::widget";
    /// Selection state machine target.
    pub const SELECTION: &str = "horizon_select::selection";
    /// Option filter target.
    pub const FILTER: &str = "horizon_select::filter";
    /// Label highlighting target.
    pub const HIGHLIGHT: &str = "horizon_select::highlight";
    /// Open/close and focus handling target.
    pub const CONTROLLER: &str = "horizon_select::controller";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations such as option
/// filtering over large lists.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_select::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Macros for common tracing patterns.
///
/// These are thin wrappers around the `tracing` crate macros with consistent
/// target naming. The calling crate must depend on `tracing`.
#[macro_export]
macro_rules! select_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "horizon_select", $($arg)*)
    };
}

#[macro_export]
macro_rules! select_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "horizon_select", $($arg)*)
    };
}
