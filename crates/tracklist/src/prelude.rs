//! Commonly used types, for glob import:
//!
//! ```
//! use tracklist::prelude::*;
//! ```

// ============================================================================
// Core
// ============================================================================

pub use tracklist_core::{Color, Error, Point, Rect, Result, Signal};

// ============================================================================
// Model
// ============================================================================

pub use crate::model::{
    CellData, CellRenderer, ColumnRegistry, ColumnSpec, ColumnType, ItemId, Justify, ListItem,
    Modifiers, SelectionMode, SortOrder, TextItem, TrackItem, TrackModel,
};

// ============================================================================
// Control
// ============================================================================

pub use crate::config::TrackListConfig;
pub use crate::widget::{
    DisplayList, Key, MonospaceMetrics, Painter, Palette, TextMetrics, TrackList,
};
