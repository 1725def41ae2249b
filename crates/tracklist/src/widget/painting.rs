//! Row rendering against an abstract painter.
//!
//! The list never talks to a graphics backend. It measures text through
//! [`TextMetrics`] and emits drawing calls through [`Painter`]; a host
//! adapts both to its toolkit. [`DisplayList`] is a recording painter used
//! for inspection and tests.

use std::borrow::Cow;

use tracklist_core::{Color, Point, Rect};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use super::rating::{RatingGeometry, RatingHover};
use crate::model::{CellData, CellRenderer, Column, IconRef, Justify, ListItem, TrackItem};

/// Horizontal padding around the icon area, split across both sides.
pub const SIDE_SPACING: f32 = 4.0;

/// Gap between the icon area and the first column's text.
pub const DETAIL_TEXT_SPACING: f32 = 2.0;

/// Appended to truncated cell text.
pub const ELLIPSIS: &str = "…";

/// Text measurement supplied by the host toolkit.
pub trait TextMetrics {
    /// Advance width of `text` in pixels.
    fn text_width(&self, text: &str) -> f32;
    fn line_height(&self) -> f32;
    fn ascent(&self) -> f32;
}

/// Fixed-advance metrics: every terminal column is `advance` pixels wide.
///
/// Wide characters count as two columns and combining marks as none.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    pub advance: f32,
    pub line_height: f32,
    pub ascent: f32,
}

impl MonospaceMetrics {
    pub fn new(advance: f32, line_height: f32, ascent: f32) -> Self {
        Self {
            advance,
            line_height,
            ascent,
        }
    }
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self::new(7.0, 14.0, 11.0)
    }
}

impl TextMetrics for MonospaceMetrics {
    fn text_width(&self, text: &str) -> f32 {
        text.width() as f32 * self.advance
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }

    fn ascent(&self) -> f32 {
        self.ascent
    }
}

/// Fits `text` into `available` pixels.
///
/// Text that fits is returned unchanged. Otherwise graphemes are dropped
/// from the end until the rest plus [`ELLIPSIS`] fits, keeping at least one.
pub fn elide_text<'a>(text: &'a str, available: f32, metrics: &dyn TextMetrics) -> Cow<'a, str> {
    if metrics.text_width(text) <= available {
        return Cow::Borrowed(text);
    }
    let ellipsis = metrics.text_width(ELLIPSIS);
    let starts: Vec<usize> = text.grapheme_indices(true).map(|(i, _)| i).collect();
    let mut kept = starts.len();
    let mut end = text.len();
    while kept > 1 && metrics.text_width(&text[..end]) + ellipsis > available {
        kept -= 1;
        end = starts[kept];
    }
    Cow::Owned(format!("{}{ELLIPSIS}", &text[..end]))
}

/// X position of a cell's text within a cell starting at `xx`.
///
/// `max_width` is the column-wide widest value; when it does not fit the
/// cell the text falls back to left alignment.
pub fn justified_x(justify: Justify, xx: f32, space: f32, max_width: f32, text_width: f32) -> f32 {
    if max_width > space {
        return xx + 2.0;
    }
    match justify {
        Justify::Normal => xx + 2.0,
        Justify::LeftRightAligned => xx + 2.0 + max_width - text_width,
        Justify::CenterRightAligned => {
            xx + (space / 2.0 - max_width / 2.0) + (max_width - text_width)
        }
        Justify::Right => xx + space - text_width - 2.0,
    }
}

/// Colors used to paint rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub alternate_background: Color,
    pub selection_background: Color,
    pub selection_text: Color,
    pub active_background: Color,
    pub active_text: Color,
    pub text: Color,
    pub shaded_text: Color,
    pub focus: Color,
    pub drop_indicator: Color,
    pub star_set: Color,
    pub star_unset: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            alternate_background: Color::rgb(0xF0, 0xF0, 0xF0),
            selection_background: Color::rgb(0x31, 0x6A, 0xC5),
            selection_text: Color::WHITE,
            active_background: Color::rgb(0xFF, 0xF4, 0xC2),
            active_text: Color::BLACK,
            text: Color::BLACK,
            shaded_text: Color::GRAY,
            focus: Color::BLACK,
            drop_indicator: Color::BLACK,
            star_set: Color::rgb(0xE0, 0xA0, 0x00),
            star_unset: Color::LIGHT_GRAY,
        }
    }
}

impl Palette {
    /// Background of a row by priority: selected, active, alternate, plain.
    pub fn row_background(&self, selected: bool, active: bool, odd: bool) -> Color {
        if selected {
            self.selection_background
        } else if active {
            self.active_background
        } else if odd {
            self.alternate_background
        } else {
            self.background
        }
    }

    pub fn row_text(&self, selected: bool, active: bool, shaded: bool) -> Color {
        if selected {
            self.selection_text
        } else if active {
            self.active_text
        } else if shaded {
            self.shaded_text
        } else {
            self.text
        }
    }
}

/// What is drawn in a row's icon area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoration {
    /// The row is the active (playing) item.
    Playing,
    Icon(IconRef),
}

/// Drawing surface supplied by the host.
pub trait Painter {
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// A dotted focus outline.
    fn draw_focus_rect(&mut self, rect: Rect, color: Color);

    /// Draws `text` with `origin` at the left end of its baseline.
    fn draw_text(&mut self, origin: Point, text: &str, color: Color);

    fn draw_decoration(&mut self, decoration: Decoration, rect: Rect);

    /// One rating glyph with its top-left corner at `origin`.
    fn draw_glyph(&mut self, origin: Point, filled: bool, color: Color);

    /// Restricts drawing to `rect` until the matching `restore_clip`.
    fn clip_rect(&mut self, rect: Rect);

    fn restore_clip(&mut self);
}

/// A drawing call recorded by [`DisplayList`].
#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    FillRect {
        rect: Rect,
        color: Color,
    },
    FocusRect {
        rect: Rect,
        color: Color,
    },
    Text {
        origin: Point,
        text: String,
        color: Color,
        clip: Option<Rect>,
    },
    Decoration {
        decoration: Decoration,
        rect: Rect,
        clip: Option<Rect>,
    },
    Glyph {
        origin: Point,
        filled: bool,
        color: Color,
        clip: Option<Rect>,
    },
}

/// A [`Painter`] that records commands instead of drawing.
///
/// Each recorded command carries the clip rectangle active when it was
/// issued.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    commands: Vec<PaintCommand>,
    clips: Vec<Rect>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.clips.clear();
    }

    /// Recorded texts, in paint order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                PaintCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Recorded glyphs as `filled` flags, in paint order.
    pub fn glyphs(&self) -> Vec<bool> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                PaintCommand::Glyph { filled, .. } => Some(*filled),
                _ => None,
            })
            .collect()
    }

    fn clip(&self) -> Option<Rect> {
        self.clips.last().copied()
    }
}

impl Painter for DisplayList {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(PaintCommand::FillRect { rect, color });
    }

    fn draw_focus_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(PaintCommand::FocusRect { rect, color });
    }

    fn draw_text(&mut self, origin: Point, text: &str, color: Color) {
        let clip = self.clip();
        self.commands.push(PaintCommand::Text {
            origin,
            text: text.to_owned(),
            color,
            clip,
        });
    }

    fn draw_decoration(&mut self, decoration: Decoration, rect: Rect) {
        let clip = self.clip();
        self.commands.push(PaintCommand::Decoration {
            decoration,
            rect,
            clip,
        });
    }

    fn draw_glyph(&mut self, origin: Point, filled: bool, color: Color) {
        let clip = self.clip();
        self.commands.push(PaintCommand::Glyph {
            origin,
            filled,
            color,
            clip,
        });
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.clips.push(rect);
    }

    fn restore_clip(&mut self) {
        self.clips.pop();
    }
}

/// Per-pass parameters for painting rows.
pub(crate) struct RowPainter<'a, T> {
    pub columns: Vec<&'a Column<T>>,
    pub palette: &'a Palette,
    pub rating: RatingGeometry,
    pub hover: RatingHover,
    pub alternate_rows: bool,
    pub icon_width: f32,
    pub offset_x: f32,
    pub width: f32,
    pub row_height: f32,
    pub total_width: f32,
}

impl<T: TrackItem> RowPainter<'_, T> {
    /// Paints one row whose top edge is at `y`.
    pub fn paint_row(
        &self,
        row: usize,
        y: f32,
        item: &ListItem<T>,
        active: bool,
        metrics: &dyn TextMetrics,
        painter: &mut dyn Painter,
    ) {
        let h = self.row_height;
        let selected = item.is_selected();
        let odd = self.alternate_rows && row % 2 == 1;
        painter.fill_rect(
            Rect::new(0.0, y, self.width, h),
            self.palette.row_background(selected, active, odd),
        );
        if item.has_focus() {
            painter.draw_focus_rect(
                Rect::new(self.offset_x + 1.0, y + 1.0, self.total_width - 2.0, h - 2.0),
                self.palette.focus,
            );
        }

        let mut xx = self.offset_x + SIDE_SPACING / 2.0;
        let decoration = if active {
            Some(Decoration::Playing)
        } else {
            item.data().icon().map(Decoration::Icon)
        };
        if let (Some(decoration), Some(first)) = (decoration, self.columns.first()) {
            painter.clip_rect(Rect::new(self.offset_x, y, first.width, h));
            painter.draw_decoration(
                decoration,
                Rect::new(xx, y + (h - self.icon_width) / 2.0, self.icon_width, self.icon_width),
            );
            painter.restore_clip();
        }
        xx += self.icon_width + DETAIL_TEXT_SPACING;

        let color = self.palette.row_text(selected, active, item.is_shaded());
        let text_top = y + (h - metrics.line_height() - 4.0) / 2.0;
        let baseline = text_top + 2.0 + metrics.ascent();

        let mut used = self.icon_width + DETAIL_TEXT_SPACING + SIDE_SPACING / 2.0;
        for column in &self.columns {
            if xx >= self.width {
                break;
            }
            let space = column.width - used;
            if xx + space >= 0.0 {
                let cell = Rect::new(xx, y, space, h);
                match column.renderer() {
                    CellRenderer::Rating => self.paint_rating(row, item, cell, painter),
                    CellRenderer::Text => {
                        if let Some(data) = item.data().column_data(column.column_type) {
                            paint_text(&data, cell, baseline, color, metrics, painter);
                        }
                    }
                }
            }
            xx += space;
            used = 0.0;
        }
    }

    fn paint_rating(
        &self,
        row: usize,
        item: &ListItem<T>,
        cell: Rect,
        painter: &mut dyn Painter,
    ) {
        let scale = self.rating.scale_max;
        let (set, unset) = match self.hover.star_for_row(row) {
            Some(star) => {
                let set = self.rating.committed_rating(star);
                (set, scale - set)
            }
            None => (item.data().rating().min(scale), 0),
        };
        let glyph_y = cell.top() + (cell.height() - self.rating.glyph_width) / 2.0;

        painter.clip_rect(cell);
        for i in 0..set + unset {
            let origin = Point::new(self.rating.glyph_x(cell.left(), i), glyph_y);
            if i < set {
                painter.draw_glyph(origin, true, self.palette.star_set);
            } else {
                painter.draw_glyph(origin, false, self.palette.star_unset);
            }
        }
        painter.restore_clip();
    }
}

fn paint_text(
    data: &CellData,
    cell: Rect,
    baseline: f32,
    color: Color,
    metrics: &dyn TextMetrics,
    painter: &mut dyn Painter,
) {
    let xx = cell.left();
    let space = cell.width();
    let available = space - 4.0;
    let text_width = metrics.text_width(&data.text);
    let (text, x) = if text_width > available {
        (elide_text(&data.text, available, metrics), xx + 2.0)
    } else {
        let x = justified_x(data.justify, xx, space, data.max_width, text_width);
        (Cow::Borrowed(data.text.as_str()), x)
    };
    painter.clip_rect(cell);
    painter.draw_text(Point::new(x, baseline), &text, color);
    painter.restore_clip();
}
