//! Tracklist - a headless, virtualized track list control.
//!
//! The crate owns the state and behavior of a multi-column music track list:
//! an ordered item store with per-item flags, a selection engine with four
//! modes, per-column sorting that preserves the current and active items,
//! drag-to-reorder of the selection, inline click-to-rate cells, and a
//! virtualized paint pass that only touches visible rows.
//!
//! Rendering, text measurement, and event delivery belong to the host: it
//! implements [`widget::Painter`] and [`widget::TextMetrics`] and forwards
//! pointer and key events to [`widget::TrackList`].
//!
//! # Example
//!
//! ```
//! use tracklist::prelude::*;
//!
//! let registry = ColumnRegistry::new().with(ColumnType::Title, ColumnSpec::new("Title"));
//! let mut list = TrackList::new(registry, SelectionMode::Extended);
//! list.add_column(ColumnType::Title, 200.0)?;
//!
//! for id in 0..3 {
//!     let item = TextItem::new().with_text(ColumnType::Title, format!("Track {id}"));
//!     list.append(ListItem::new(id, item), true);
//! }
//! list.select(0);
//! list.set_anchor(Some(0));
//! list.extend_selection(2);
//! assert_eq!(list.selected_ids(), vec![0, 1, 2]);
//! # Ok::<(), tracklist::Error>(())
//! ```

pub use tracklist_core::*;

pub mod config;
pub mod debug;
pub mod model;
pub mod prelude;
pub mod widget;
