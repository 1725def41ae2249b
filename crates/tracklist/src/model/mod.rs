//! List data: items, columns, and the state machines that act on them.
//!
//! - [`TrackModel`]: the item store plus anchor/current/extent/active
//! - selection, sort, and reorder operations on [`TrackModel`]
//! - [`ColumnModel`] with the [`ColumnRegistry`] of comparators and renderers

mod column;
mod item;
mod reorder;
mod selection;
mod sort;
mod store;
mod track_model;

pub use column::{
    CellRenderer, Column, ColumnModel, ColumnRegistry, ColumnSpec, ColumnType, Comparator,
    DEFAULT_COLUMN_WIDTH, MIN_COLUMN_WIDTH,
};
pub use item::{CellData, IconRef, ItemId, ItemState, Justify, ListItem, TextItem, TrackItem};
pub use selection::{Modifiers, SelectionMode};
pub use sort::{SortOrder, SortState, shell_sort};
pub use store::{ItemStore, TrackedIndices};
pub use track_model::TrackModel;
