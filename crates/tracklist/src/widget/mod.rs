//! The list control and its parts.
//!
//! - [`TrackList`]: the control itself
//! - [`Viewport`]: scrolling and row geometry
//! - [`DragSession`]: drag-to-reorder state
//! - [`RatingGeometry`] and [`RatingHover`]: the inline rating cell
//! - [`Painter`] and [`TextMetrics`]: the host's drawing and measuring seams

mod drag_drop;
mod painting;
mod rating;
mod track_list;
mod viewport;

pub use drag_drop::{DragSession, DragState, DropIndicator, compute_drop_target};
pub use painting::{
    DETAIL_TEXT_SPACING, Decoration, DisplayList, ELLIPSIS, MonospaceMetrics, PaintCommand,
    Painter, Palette, SIDE_SPACING, TextMetrics, elide_text, justified_x,
};
pub use rating::{RatingGeometry, RatingHover};
pub use track_list::{Key, TrackList};
pub use viewport::{Viewport, visible_row_range};
