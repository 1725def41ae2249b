//! Scroll position and row geometry.
//!
//! Coordinates are widget-relative: the header occupies `[0, header_height)`
//! and rows start below it, shifted by the vertical scroll offset. Offsets
//! are zero or negative, as in "content position relative to the widget".

use tracklist_core::Rect;

/// Rows intersecting `rect`, as a closed interval, or `None` if no row does.
///
/// The interval is derived arithmetically, so its length is bounded by
/// `rect.height() / row_height + 1` whatever `count` is.
pub fn visible_row_range(
    rect: Rect,
    scroll_y: f32,
    header_height: f32,
    row_height: f32,
    count: usize,
) -> Option<(usize, usize)> {
    if count == 0 || row_height <= 0.0 {
        return None;
    }
    let lo = ((rect.top() - scroll_y - header_height) / row_height).floor();
    let hi = ((rect.bottom() - scroll_y - header_height) / row_height).floor();
    if hi < 0.0 {
        return None;
    }
    let lo = lo.max(0.0) as usize;
    let hi = (hi as usize).min(count - 1);
    (lo <= hi).then_some((lo, hi))
}

/// The visible window onto the rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Horizontal content offset, zero or negative.
    pub offset_x: f32,
    /// Vertical content offset, zero or negative.
    pub offset_y: f32,
    /// Visible width of the widget.
    pub width: f32,
    /// Visible height of the widget, header included.
    pub height: f32,
    pub header_height: f32,
    pub row_height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            width: 0.0,
            height: 0.0,
            header_height: 24.0,
            row_height: 20.0,
        }
    }
}

impl Viewport {
    /// Height available to rows.
    pub fn rows_height(&self) -> f32 {
        (self.height - self.header_height).max(0.0)
    }

    pub fn content_height(&self, count: usize) -> f32 {
        count as f32 * self.row_height
    }

    /// Top edge of a row in widget coordinates.
    pub fn row_top(&self, index: usize) -> f32 {
        self.offset_y + self.header_height + index as f32 * self.row_height
    }

    pub fn row_rect(&self, index: usize) -> Rect {
        Rect::new(0.0, self.row_top(index), self.width, self.row_height)
    }

    /// Row under widget-relative `y`, if any.
    pub fn row_at(&self, y: f32, count: usize) -> Option<usize> {
        if y < self.header_height {
            return None;
        }
        let row = ((y - self.offset_y - self.header_height) / self.row_height).floor();
        (row >= 0.0 && (row as usize) < count).then_some(row as usize)
    }

    /// Rows intersecting a widget-relative rectangle.
    pub fn rows_in_rect(&self, rect: Rect, count: usize) -> Option<(usize, usize)> {
        visible_row_range(rect, self.offset_y, self.header_height, self.row_height, count)
    }

    fn min_offset_y(&self, count: usize) -> f32 {
        (self.rows_height() - self.content_height(count)).min(0.0)
    }

    /// Sets the vertical offset, clamped to the content. Returns whether it
    /// changed.
    pub fn set_offset_y(&mut self, offset_y: f32, count: usize) -> bool {
        let clamped = offset_y.clamp(self.min_offset_y(count), 0.0);
        let changed = clamped != self.offset_y;
        self.offset_y = clamped;
        changed
    }

    pub fn scroll_by(&mut self, dy: f32, count: usize) -> bool {
        self.set_offset_y(self.offset_y + dy, count)
    }

    /// Horizontal scroll, clamped to the total column width.
    pub fn set_offset_x(&mut self, offset_x: f32, content_width: f32) -> bool {
        let min = (self.width - content_width).min(0.0);
        let clamped = offset_x.clamp(min, 0.0);
        let changed = clamped != self.offset_x;
        self.offset_x = clamped;
        changed
    }

    /// Scrolls the least amount that brings row `index` fully into view.
    pub fn make_visible(&mut self, index: usize, count: usize) -> bool {
        let y = self.header_height + index as f32 * self.row_height;
        let mut py = self.offset_y;
        if py + y + self.row_height >= self.rows_height() + self.header_height {
            py = self.header_height + self.rows_height() - y - self.row_height;
        }
        if py + y <= self.header_height {
            py = self.header_height - y;
        }
        self.set_offset_y(py, count)
    }
}
