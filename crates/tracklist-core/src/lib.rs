//! Core systems for tracklist.
//!
//! This crate provides the plumbing the list control is built on, with no
//! knowledge of rows, columns, or selection:
//!
//! - **Signal/Slot System**: Type-safe notifications to collaborators
//! - **Geometry**: Points, rectangles, and colors in logical pixels
//! - **Errors**: The configuration error type and `Result` alias
//! - **Logging**: `tracing` targets, span names, and performance spans
//!
//! # Signal/Slot Example
//!
//! ```
//! use tracklist_core::Signal;
//!
//! let reordered = Signal::<Vec<i64>>::new();
//!
//! let conn_id = reordered.connect(|ids| {
//!     println!("persist order: {ids:?}");
//! });
//!
//! reordered.emit(vec![3, 1, 2]);
//! reordered.disconnect(conn_id);
//! ```

mod error;
pub mod logging;
pub mod signal;
pub mod types;

pub use error::{Error, Result};
pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use types::{Color, Point, Rect};
