//! Logging facilities for tracklist.
//!
//! tracklist uses the `tracing` crate for instrumentation. Nothing is printed
//! unless the application installs a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("tracklist::drag=debug,tracklist::sort=debug")
//!     .init();
//! ```
//!
//! The [`targets`] constants name every subsystem so they can be filtered
//! independently; [`PerfSpan`] brackets the expensive passes (sort, drop,
//! paint) so their durations show up in a profiling subscriber.

/// Span names used throughout tracklist for tracing.
pub mod span_names {
    /// A full sort pass.
    pub const SORT: &str = "tracklist::sort";
    /// A drop (batch relocation) pass.
    pub const DROP: &str = "tracklist::drop";
    /// A paint pass over an invalidated rectangle.
    pub const PAINT: &str = "tracklist::paint";
    /// Installing an externally produced order.
    pub const INSTALL_ORDER: &str = "tracklist::install_order";
}

/// Target names for log filtering.
pub mod targets {
    /// Signal/slot target.
    pub const SIGNAL: &str = "tracklist_core::signal";
    /// Item store lifecycle target.
    pub const STORE: &str = "tracklist::store";
    /// Selection engine target.
    pub const SELECTION: &str = "tracklist::selection";
    /// Sort engine target.
    pub const SORT: &str = "tracklist::sort";
    /// Drag-reorder target.
    pub const DRAG: &str = "tracklist::drag";
    /// Rating hit-test/hover target.
    pub const RATING: &str = "tracklist::rating";
    /// Viewport and paint target.
    pub const PAINT: &str = "tracklist::paint";
    /// Configuration target.
    pub const CONFIG: &str = "tracklist::config";
    /// Performance spans.
    pub const PERF: &str = "tracklist::perf";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Used to measure the duration of sort, drop, and paint passes.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}
