//! The track list control.
//!
//! [`TrackList`] ties the model, the column model, sorting, the viewport,
//! rating hover, and drag sessions together. Hosts feed it pointer and key
//! events already translated into widget coordinates, and paint it through a
//! [`Painter`].
//!
//! # Example
//!
//! ```
//! use tracklist::prelude::*;
//!
//! let registry = ColumnRegistry::new()
//!     .with(ColumnType::Title, ColumnSpec::new("Title").with_key_order(|item: &TextItem| {
//!         item.text(ColumnType::Title).unwrap_or_default().to_owned()
//!     }));
//! let mut list = TrackList::new(registry, SelectionMode::Extended);
//! list.add_column(ColumnType::Title, 200.0).unwrap();
//!
//! for (id, title) in ["Song B", "Song A"].into_iter().enumerate() {
//!     let item = TextItem::new().with_text(ColumnType::Title, title);
//!     list.append(ListItem::new(id as i64, item), true);
//! }
//!
//! list.header_clicked(ColumnType::Title);
//! assert_eq!(list.model().ids(), vec![1, 0]);
//! ```

use tracklist_core::logging::{span_names, targets};
use tracklist_core::{Error, PerfSpan, Point, Rect, Result, Signal};

use super::drag_drop::{DragSession, DropIndicator, compute_drop_target};
use super::painting::{
    DETAIL_TEXT_SPACING, Painter, Palette, RowPainter, SIDE_SPACING, TextMetrics,
};
use super::rating::{RatingGeometry, RatingHover};
use super::viewport::Viewport;
use crate::model::{
    CellRenderer, ColumnModel, ColumnRegistry, ColumnType, ItemId, ListItem, Modifiers,
    SelectionMode, SortOrder, SortState, TrackItem, TrackModel,
};

/// Navigation and action keys the list handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Left,
    Right,
    Space,
    Enter,
}

/// Remembered between press and release.
#[derive(Debug, Clone, Copy)]
struct Press {
    was_selected: bool,
}

/// A virtualized, multi-column, sortable, selectable list of tracks.
///
/// # Signals
///
/// Item and selection notifications live on [`TrackList::model`]. The list
/// adds:
///
/// - `rating_changed`: (item id, rating) committed by a click
/// - `hover_changed`: the hovered (row, glyph) in a rating column
/// - `clicked`: a row was clicked or reached with the keyboard
/// - `double_clicked` / `triple_clicked`: multi-click releases on a row
/// - `activated`: Enter or a double click on the current row
/// - `drag_started`: ids of the items a reorder drag carries
/// - `sort_changed`: the new sort, `None` when unsorted
pub struct TrackList<T> {
    pub(crate) model: TrackModel<T>,
    pub(crate) columns: ColumnModel<T>,
    pub(crate) registry: ColumnRegistry<T>,
    pub(crate) sort: SortState,
    pub(crate) viewport: Viewport,
    pub(crate) rating: RatingGeometry,
    pub(crate) hover: RatingHover,
    pub(crate) drag: DragSession,
    pub(crate) palette: Palette,
    pub(crate) alternate_rows: bool,
    pub(crate) icon_width: f32,
    press: Option<Press>,
    needs_repaint: bool,

    pub rating_changed: Signal<(ItemId, u8)>,
    pub hover_changed: Signal<Option<(usize, u8)>>,
    pub clicked: Signal<usize>,
    pub double_clicked: Signal<usize>,
    pub triple_clicked: Signal<usize>,
    pub activated: Signal<usize>,
    pub drag_started: Signal<Vec<ItemId>>,
    pub sort_changed: Signal<Option<(ColumnType, SortOrder)>>,
}

static_assertions::assert_impl_all!(TrackList<crate::model::TextItem>: Send, Sync);

impl<T: TrackItem> TrackList<T> {
    /// Creates an empty list with no columns installed.
    pub fn new(registry: ColumnRegistry<T>, mode: SelectionMode) -> Self {
        Self {
            model: TrackModel::new(mode),
            columns: ColumnModel::new(),
            registry,
            sort: SortState::default(),
            viewport: Viewport::default(),
            rating: RatingGeometry::default(),
            hover: RatingHover::default(),
            drag: DragSession::new(),
            palette: Palette::default(),
            alternate_rows: true,
            icon_width: 16.0,
            press: None,
            needs_repaint: false,
            rating_changed: Signal::new(),
            hover_changed: Signal::new(),
            clicked: Signal::new(),
            double_clicked: Signal::new(),
            triple_clicked: Signal::new(),
            activated: Signal::new(),
            drag_started: Signal::new(),
            sort_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Parts
    // =========================================================================

    /// Read access to items and list state, and its signals.
    pub fn model(&self) -> &TrackModel<T> {
        &self.model
    }

    pub fn columns(&self) -> &ColumnModel<T> {
        &self.columns
    }

    /// Column widths, visibility, and order may be changed freely.
    pub fn columns_mut(&mut self) -> &mut ColumnModel<T> {
        self.needs_repaint = true;
        &mut self.columns
    }

    pub fn registry(&self) -> &ColumnRegistry<T> {
        &self.registry
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
        self.needs_repaint = true;
    }

    pub fn rating_geometry(&self) -> RatingGeometry {
        self.rating
    }

    pub fn set_rating_geometry(&mut self, rating: RatingGeometry) {
        self.rating = rating;
        self.needs_repaint = true;
    }

    pub fn set_alternate_rows(&mut self, enabled: bool) {
        self.alternate_rows = enabled;
        self.needs_repaint = true;
    }

    pub fn set_icon_width(&mut self, width: f32) {
        self.icon_width = width;
        self.needs_repaint = true;
    }

    pub fn set_drag_threshold(&mut self, threshold: f32) {
        self.drag.set_threshold(threshold);
    }

    pub fn drag_session(&self) -> &DragSession {
        &self.drag
    }

    pub fn hover(&self) -> Option<(usize, u8)> {
        self.hover.get()
    }

    /// Returns whether anything visible changed since the last call.
    pub fn take_needs_repaint(&mut self) -> bool {
        std::mem::take(&mut self.needs_repaint)
    }

    // =========================================================================
    // Columns
    // =========================================================================

    /// Installs a registered column at the end of the display order.
    pub fn add_column(&mut self, column: ColumnType, width: f32) -> Result<()> {
        let spec = self
            .registry
            .get(column)
            .cloned()
            .ok_or_else(|| Error::unknown_column(column.name()))?;
        self.columns.add_column(column, spec, width);
        self.needs_repaint = true;
        Ok(())
    }

    /// Visible column under widget-relative `x`.
    pub fn column_at(&self, x: f32) -> Option<ColumnType> {
        self.columns.column_at(x - self.viewport.offset_x)
    }

    /// Left edge of a column's content in widget coordinates.
    ///
    /// The first visible column's content starts after the icon area.
    pub fn cell_left(&self, column: ColumnType) -> Option<f32> {
        let offset = self.columns.column_offset(column)?;
        let mut left = self.viewport.offset_x + offset;
        if self.columns.first_visible() == Some(column) {
            left += SIDE_SPACING / 2.0 + self.icon_width + DETAIL_TEXT_SPACING;
        }
        Some(left)
    }

    /// Fits a column to its content. See [`ColumnModel::auto_size`].
    pub fn auto_size_column(&mut self, column: ColumnType, metrics: &dyn TextMetrics) -> Option<f32> {
        self.needs_repaint = true;
        self.columns.auto_size(
            column,
            metrics,
            &self.rating,
            self.icon_width,
            self.model.items().map(|item| item.data()),
        )
    }

    fn is_rating_column(&self, column: ColumnType) -> bool {
        self.columns
            .column(column)
            .is_some_and(|c| c.renderer() == CellRenderer::Rating)
    }

    // =========================================================================
    // Items
    // =========================================================================

    pub fn insert(&mut self, index: usize, item: ListItem<T>, notify: bool) {
        self.model.insert(index, item, notify);
        self.needs_repaint = true;
    }

    pub fn append(&mut self, item: ListItem<T>, notify: bool) {
        self.model.append(item, notify);
        self.needs_repaint = true;
    }

    pub fn replace(&mut self, index: usize, item: ListItem<T>, notify: bool) -> T {
        self.needs_repaint = true;
        self.model.replace(index, item, notify)
    }

    pub fn remove(&mut self, index: usize, notify: bool) -> T {
        self.hover.clear();
        self.needs_repaint = true;
        self.model.remove(index, notify)
    }

    pub fn move_item(&mut self, new: usize, old: usize, notify: bool) {
        self.model.move_item(new, old, notify);
        self.needs_repaint = true;
    }

    pub fn clear(&mut self, notify: bool) {
        self.hover.clear();
        self.drag.cancel();
        self.press = None;
        self.model.clear(notify);
        self.viewport.set_offset_y(0.0, 0);
        self.needs_repaint = true;
    }

    /// Installs an order produced elsewhere (see
    /// [`TrackModel::install_order`]).
    pub fn install_order(&mut self, ids: &[ItemId]) {
        self.model.install_order(ids);
        self.needs_repaint = true;
    }

    #[track_caller]
    pub fn item_at(&self, index: usize) -> &ListItem<T> {
        self.model.item_at(index)
    }

    pub fn item_count(&self) -> usize {
        self.model.item_count()
    }

    pub fn find_by_id(&self, id: ItemId) -> Option<usize> {
        self.model.find_by_id(id)
    }

    pub fn set_draggable(&mut self, index: usize, draggable: bool) {
        self.model.set_draggable(index, draggable);
    }

    pub fn set_playable(&mut self, index: usize, playable: bool) {
        self.model.set_playable(index, playable);
        self.needs_repaint = true;
    }

    pub fn set_shaded(&mut self, index: usize, shaded: bool) {
        self.model.set_shaded(index, shaded);
        self.needs_repaint = true;
    }

    // =========================================================================
    // Selection
    // =========================================================================

    #[track_caller]
    pub fn is_selected(&self, index: usize) -> bool {
        self.model.is_selected(index)
    }

    pub fn select(&mut self, index: usize) -> bool {
        let changed = self.model.select(index);
        self.repaint_if(changed)
    }

    pub fn deselect(&mut self, index: usize) -> bool {
        let changed = self.model.deselect(index);
        self.repaint_if(changed)
    }

    pub fn toggle(&mut self, index: usize) -> bool {
        let changed = self.model.toggle(index);
        self.repaint_if(changed)
    }

    pub fn extend_selection(&mut self, to: usize) -> bool {
        let changed = self.model.extend_selection(to);
        self.repaint_if(changed)
    }

    pub fn kill_selection(&mut self) -> bool {
        let changed = self.model.kill_selection();
        self.repaint_if(changed)
    }

    pub fn select_all(&mut self) -> bool {
        let changed = self.model.select_all();
        self.repaint_if(changed)
    }

    pub fn deselect_all(&mut self) -> bool {
        let changed = self.model.deselect_all();
        self.repaint_if(changed)
    }

    pub fn select_inverse(&mut self) -> bool {
        let changed = self.model.select_inverse();
        self.repaint_if(changed)
    }

    pub fn set_anchor(&mut self, index: Option<usize>) {
        self.model.set_anchor(index);
    }

    pub fn current_index(&self) -> Option<usize> {
        self.model.current_index()
    }

    pub fn set_current(&mut self, index: Option<usize>, notify: bool) {
        self.model.set_current(index, notify);
        self.needs_repaint = true;
    }

    pub fn selected_indices(&self) -> Vec<usize> {
        self.model.selected_indices()
    }

    pub fn selected_ids(&self) -> Vec<ItemId> {
        self.model.selected_ids()
    }

    /// Rubber-band selection: selects every row intersecting `rect`.
    pub fn select_in_rectangle(&mut self, rect: Rect) -> bool {
        let left = self.viewport.offset_x;
        let right = left + self.columns.total_width();
        if rect.right() < left || rect.left() > right {
            return false;
        }
        let Some((lo, hi)) = self.viewport.rows_in_rect(rect, self.model.item_count()) else {
            return false;
        };
        tracing::debug!(target: targets::SELECTION, lo, hi, "rubber-band selection");
        let changed = self.model.select_rows(lo..=hi);
        self.repaint_if(changed)
    }

    fn repaint_if(&mut self, changed: bool) -> bool {
        self.needs_repaint |= changed;
        changed
    }

    // =========================================================================
    // Active item and focus
    // =========================================================================

    pub fn set_active(&mut self, index: Option<usize>) {
        self.model.set_active(index);
        self.needs_repaint = true;
    }

    pub fn active(&self) -> Option<usize> {
        self.model.active()
    }

    pub fn focus_in(&mut self) {
        self.model.focus_in();
        self.needs_repaint = true;
    }

    pub fn focus_out(&mut self) {
        self.model.focus_out();
        self.needs_repaint = true;
    }

    // =========================================================================
    // Sorting
    // =========================================================================

    /// Sorts by `column` in `order` and remembers it as the active sort.
    pub fn set_sort(&mut self, column: ColumnType, order: SortOrder) {
        self.sort.set(column, order);
        self.resort();
        self.sort_changed.emit(self.sort.get());
    }

    /// The active sort, or `None` when unsorted.
    pub fn get_sort(&self) -> Option<(ColumnType, SortOrder)> {
        self.sort.get()
    }

    /// Returns to the unsorted state. Items keep their current order.
    pub fn clear_sort(&mut self) {
        if self.sort.get().is_some() {
            self.sort.clear();
            self.sort_changed.emit(None);
        }
    }

    /// Header click: toggles the direction of the active column, or sorts
    /// ascending by a new one.
    pub fn header_clicked(&mut self, column: ColumnType) {
        let (column, order) = self.sort.clicked(column);
        tracing::debug!(target: targets::SORT, %column, ?order, "header clicked");
        self.resort();
        self.sort_changed.emit(Some((column, order)));
    }

    /// Re-applies the active sort, e.g. after bulk inserts.
    pub fn resort(&mut self) {
        let Some((column, order)) = self.sort.get() else {
            return;
        };
        let comparator = self.registry.get(column).and_then(|spec| match order {
            SortOrder::Ascending => spec.ascending.clone(),
            SortOrder::Descending => spec.descending.clone(),
        });
        self.model.sort_by(comparator.as_ref());
        self.needs_repaint = true;
    }

    // =========================================================================
    // Viewport
    // =========================================================================

    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport.width = width;
        self.viewport.height = height;
        let count = self.model.item_count();
        self.viewport.set_offset_y(self.viewport.offset_y, count);
        self.needs_repaint = true;
    }

    pub fn set_row_height(&mut self, row_height: f32) {
        self.viewport.row_height = row_height;
        self.needs_repaint = true;
    }

    pub fn set_header_height(&mut self, header_height: f32) {
        self.viewport.header_height = header_height;
        self.needs_repaint = true;
    }

    pub fn scroll_to(&mut self, offset_y: f32) -> bool {
        let count = self.model.item_count();
        let changed = self.viewport.set_offset_y(offset_y, count);
        self.repaint_if(changed)
    }

    pub fn scroll_by(&mut self, dy: f32) -> bool {
        let count = self.model.item_count();
        let changed = self.viewport.scroll_by(dy, count);
        self.repaint_if(changed)
    }

    /// Scrolls so that row `index` is fully visible.
    #[track_caller]
    pub fn make_visible(&mut self, index: usize) -> bool {
        self.model.check_index(index, "make_visible");
        let count = self.model.item_count();
        let changed = self.viewport.make_visible(index, count);
        self.repaint_if(changed)
    }

    /// Row under widget-relative `y`.
    pub fn row_at(&self, y: f32) -> Option<usize> {
        self.viewport.row_at(y, self.model.item_count())
    }

    // =========================================================================
    // Pointer
    // =========================================================================

    /// Left button press. Returns whether the press hit a row.
    ///
    /// The pressed row becomes current. A press in a rating column commits
    /// the rating and leaves the selection alone.
    pub fn mouse_press(&mut self, pos: Point, modifiers: Modifiers) -> bool {
        self.press = None;
        self.drag.cancel();
        let Some(row) = self.row_at(pos.y) else {
            return false;
        };
        let was_selected = self.model.is_selected(row);
        self.model.set_current(Some(row), true);
        self.needs_repaint = true;

        if let Some(column) = self.column_at(pos.x)
            && self.is_rating_column(column)
        {
            self.commit_rating(row, column, pos.x);
            return true;
        }

        match self.model.selection_mode() {
            SelectionMode::Extended => {
                if modifiers.shift {
                    self.model.shift_extend(row);
                } else if modifiers.control {
                    if !was_selected {
                        self.model.select(row);
                    }
                    self.model.set_anchor(Some(row));
                } else {
                    if !was_selected {
                        self.model.kill_selection();
                        self.model.select(row);
                    }
                    self.model.set_anchor(Some(row));
                }
            }
            SelectionMode::Multiple | SelectionMode::Single => {
                if !was_selected {
                    self.model.select(row);
                }
            }
            SelectionMode::Browse => {}
        }

        let item = self.model.item_at(row);
        if item.is_selected() && item.is_draggable() {
            self.drag.prepare(pos);
        }
        self.press = Some(Press { was_selected });
        true
    }

    fn commit_rating(&mut self, row: usize, column: ColumnType, x: f32) {
        let Some(col_x) = self.cell_left(column) else {
            return;
        };
        let star = self.rating.star_index(col_x, x);
        let rating = self.rating.committed_rating(star);
        self.model.item_data_mut(row).set_rating(rating);
        let id = self.model.item_at(row).id();
        tracing::debug!(target: targets::RATING, id, rating, "rating committed");
        self.rating_changed.emit((id, rating));
    }

    /// Pointer motion. Drives the drag session and the rating hover.
    pub fn mouse_move(&mut self, pos: Point) {
        if self.drag.is_pending() {
            let model = &self.model;
            if self.drag.check_start(pos, || model.selected_ids()) {
                tracing::debug!(target: targets::DRAG, items = self.drag.ids().len(), "drag started");
                self.drag_started.emit(self.drag.ids().to_vec());
            }
        }
        if self.drag.is_dragging() {
            let vp = &self.viewport;
            let indicator = compute_drop_target(
                pos.y,
                vp.offset_y,
                vp.header_height,
                vp.row_height,
                self.model.item_count(),
            )
            .map(|target| {
                DropIndicator::new(target, vp.offset_y, vp.header_height, vp.row_height, vp.width)
            });
            if self.drag.update(indicator) {
                self.needs_repaint = true;
            }
            return;
        }
        if self.press.is_none() {
            self.update_hover(pos);
        }
    }

    fn update_hover(&mut self, pos: Point) {
        let hovered = self.row_at(pos.y).zip(self.column_at(pos.x)).and_then(|(row, column)| {
            if !self.is_rating_column(column) {
                return None;
            }
            let col_x = self.cell_left(column)?;
            Some((row, self.rating.star_index(col_x, pos.x)))
        });
        let changed = match hovered {
            Some((row, star)) => self.hover.update(row, star),
            None => self.hover.clear(),
        };
        if changed {
            tracing::trace!(target: targets::RATING, hover = ?self.hover.get(), "hover changed");
            self.needs_repaint = true;
            self.hover_changed.emit(self.hover.get());
        }
    }

    /// The pointer left the widget.
    pub fn pointer_left(&mut self) {
        if self.hover.clear() {
            self.needs_repaint = true;
            self.hover_changed.emit(None);
        }
    }

    /// Left button release. Completes a drop, or applies the deferred part
    /// of a click.
    ///
    /// `click_count` is the host's multi-click count for this release: 1
    /// emits `clicked`, 2 emits `double_clicked` and `activated`, 3 emits
    /// `triple_clicked`.
    pub fn mouse_release(&mut self, modifiers: Modifiers, click_count: u32) -> bool {
        let press = self.press.take();
        if self.drag.is_dragging() {
            if let Some(target) = self.drag.finish() {
                self.drop_selection(target);
            }
            self.needs_repaint = true;
            return true;
        }
        self.drag.cancel();
        let Some(press) = press else {
            return false;
        };
        let Some(current) = self.model.current_index() else {
            return true;
        };

        match self.model.selection_mode() {
            SelectionMode::Extended => {
                if modifiers.control {
                    if press.was_selected {
                        self.model.deselect(current);
                    }
                } else if !modifiers.shift && press.was_selected {
                    self.model.kill_selection();
                    self.model.select(current);
                }
            }
            SelectionMode::Multiple | SelectionMode::Single => {
                if press.was_selected {
                    self.model.deselect(current);
                }
            }
            SelectionMode::Browse => {}
        }

        self.make_visible(current);
        self.model.set_anchor(Some(current));
        self.needs_repaint = true;
        match click_count {
            1 => self.clicked.emit(current),
            2 => {
                self.double_clicked.emit(current);
                tracing::debug!(target: targets::SELECTION, current, "activated by double click");
                self.activated.emit(current);
            }
            3 => self.triple_clicked.emit(current),
            _ => {}
        }
        true
    }

    /// Moves the selected items to drop boundary `target`.
    pub fn drop_selection(&mut self, target: usize) -> bool {
        let changed = self.model.apply_move(target);
        self.repaint_if(changed)
    }

    /// Aborts a drag or pending press without touching the items.
    pub fn cancel_drag(&mut self) {
        if self.drag.is_dragging() {
            self.needs_repaint = true;
        }
        self.drag.cancel();
        self.press = None;
    }

    // =========================================================================
    // Keyboard
    // =========================================================================

    /// Handles a key press. Returns whether the key was consumed.
    pub fn key_press(&mut self, key: Key, modifiers: Modifiers) -> bool {
        let count = self.model.item_count();
        let current = self.model.current_index();
        match key {
            Key::PageUp => {
                self.scroll_by(self.viewport.rows_height());
            }
            Key::PageDown => {
                self.scroll_by(-self.viewport.rows_height());
            }
            Key::Left | Key::Right => {
                let dx = if key == Key::Left { 10.0 } else { -10.0 };
                let width = self.columns.total_width();
                let changed = self.viewport.set_offset_x(self.viewport.offset_x + dx, width);
                self.repaint_if(changed);
            }
            Key::Up | Key::Down | Key::Home | Key::End => {
                let target = match key {
                    Key::Up => current.and_then(|c| c.checked_sub(1)),
                    Key::Down => Some(current.map_or(0, |c| c + 1)),
                    Key::Home => Some(0),
                    _ => count.checked_sub(1),
                };
                if let Some(index) = target.filter(|&i| i < count) {
                    self.navigate_to(index, modifiers);
                }
                if let Some(current) = self.model.current_index() {
                    self.clicked.emit(current);
                }
            }
            Key::Space => {
                let Some(current) = current else {
                    return true;
                };
                match self.model.selection_mode() {
                    SelectionMode::Extended => {
                        if modifiers.shift {
                            self.model.shift_extend(current);
                        } else if modifiers.control {
                            self.model.toggle(current);
                        } else {
                            self.model.kill_selection();
                            self.model.select(current);
                        }
                    }
                    SelectionMode::Multiple | SelectionMode::Single => {
                        self.model.toggle(current);
                    }
                    SelectionMode::Browse => {}
                }
                self.model.set_anchor(Some(current));
                self.needs_repaint = true;
                self.clicked.emit(current);
            }
            Key::Enter => {
                if let Some(current) = current {
                    self.activated.emit(current);
                }
            }
        }
        true
    }

    fn navigate_to(&mut self, index: usize, modifiers: Modifiers) {
        self.model.set_current(Some(index), true);
        self.make_visible(index);
        if self.model.selection_mode() == SelectionMode::Extended {
            if modifiers.shift {
                self.model.shift_extend(index);
            } else if !modifiers.control {
                self.model.kill_selection();
                self.model.select(index);
                self.model.set_anchor(Some(index));
            }
        }
        self.needs_repaint = true;
    }

    // =========================================================================
    // Painting
    // =========================================================================

    /// Paints the rows intersecting `rect` and returns their range.
    ///
    /// The area below the last row is filled with the background; the drop
    /// indicator is drawn last.
    pub fn paint(
        &self,
        rect: Rect,
        metrics: &dyn TextMetrics,
        painter: &mut dyn Painter,
    ) -> Option<(usize, usize)> {
        let _perf = PerfSpan::new(span_names::PAINT);
        let count = self.model.item_count();
        let vp = &self.viewport;
        let range = vp.rows_in_rect(rect, count);

        let rows = RowPainter {
            columns: self.columns.visible_columns(),
            palette: &self.palette,
            rating: self.rating,
            hover: self.hover,
            alternate_rows: self.alternate_rows,
            icon_width: self.icon_width,
            offset_x: vp.offset_x,
            width: vp.width,
            row_height: vp.row_height,
            total_width: self.columns.total_width(),
        };
        let active = self.model.active();
        if let Some((lo, hi)) = range {
            for row in lo..=hi {
                rows.paint_row(
                    row,
                    vp.row_top(row),
                    self.model.item_at(row),
                    active == Some(row),
                    metrics,
                    painter,
                );
            }
        }

        let below = vp.row_top(count).max(rect.top()).max(vp.header_height);
        if below < rect.bottom() {
            painter.fill_rect(
                Rect::new(rect.left(), below, rect.width(), rect.bottom() - below),
                self.palette.background,
            );
        }
        if let Some(indicator) = self.drag.indicator() {
            painter.fill_rect(indicator.rect, self.palette.drop_indicator);
        }
        tracing::trace!(target: targets::PAINT, ?range, "painted");
        range
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::model::{ColumnSpec, TextItem};
    use crate::widget::painting::{Decoration, DisplayList, MonospaceMetrics, PaintCommand};

    fn registry() -> ColumnRegistry<TextItem> {
        ColumnRegistry::new()
            .with(
                ColumnType::Title,
                ColumnSpec::new("Title").with_key_order(|item: &TextItem| {
                    item.text(ColumnType::Title).unwrap_or_default().to_owned()
                }),
            )
            .with(
                ColumnType::Rating,
                ColumnSpec::new("Rating")
                    .with_renderer(CellRenderer::Rating)
                    .with_key_order(|item: &TextItem| item.rating()),
            )
    }

    /// Title at x 0..100 (content from 20), Rating at 100..170.
    fn list(n: i64) -> TrackList<TextItem> {
        let mut list = TrackList::new(registry(), SelectionMode::Extended);
        list.add_column(ColumnType::Title, 100.0).unwrap();
        list.add_column(ColumnType::Rating, 70.0).unwrap();
        list.set_viewport_size(300.0, 24.0 + 100.0);
        for id in 0..n {
            let item = TextItem::new().with_text(ColumnType::Title, format!("Track {id}"));
            list.append(ListItem::new(id, item), false);
        }
        list
    }

    fn row_point(row: usize) -> Point {
        Point::new(50.0, 24.0 + row as f32 * 20.0 + 5.0)
    }

    #[test]
    fn test_unknown_column_is_an_error() {
        let mut list = list(0);
        let err = list.add_column(ColumnType::Year, 40.0).unwrap_err();
        assert!(matches!(err, Error::UnknownColumn(name) if name == "year"));
    }

    #[test]
    fn test_plain_click_selects_one() {
        let mut list = list(5);
        list.select(0);
        list.select(1);
        assert!(list.mouse_press(row_point(3), Modifiers::NONE));
        list.mouse_release(Modifiers::NONE, 1);
        assert_eq!(list.selected_indices(), vec![3]);
        assert_eq!(list.current_index(), Some(3));
        assert_eq!(list.model().anchor_index(), Some(3));
    }

    #[test]
    fn test_plain_click_on_selection_defers_clear() {
        let mut list = list(5);
        list.mouse_press(row_point(1), Modifiers::NONE);
        list.mouse_release(Modifiers::NONE, 1);
        list.mouse_press(row_point(3), Modifiers::SHIFT);
        list.mouse_release(Modifiers::SHIFT, 1);
        assert_eq!(list.selected_indices(), vec![1, 2, 3]);

        list.mouse_press(row_point(2), Modifiers::NONE);
        assert_eq!(list.selected_indices(), vec![1, 2, 3]);
        list.mouse_release(Modifiers::NONE, 1);
        assert_eq!(list.selected_indices(), vec![2]);
    }

    #[test]
    fn test_ctrl_click_toggles_on_release() {
        let mut list = list(5);
        list.mouse_press(row_point(1), Modifiers::CONTROL);
        list.mouse_release(Modifiers::CONTROL, 1);
        list.mouse_press(row_point(3), Modifiers::CONTROL);
        list.mouse_release(Modifiers::CONTROL, 1);
        assert_eq!(list.selected_indices(), vec![1, 3]);

        list.mouse_press(row_point(1), Modifiers::CONTROL);
        assert!(list.is_selected(1));
        list.mouse_release(Modifiers::CONTROL, 1);
        assert_eq!(list.selected_indices(), vec![3]);
    }

    #[test]
    fn test_press_below_rows_is_ignored() {
        let mut list = list(2);
        assert!(!list.mouse_press(Point::new(50.0, 110.0), Modifiers::NONE));
        assert!(!list.mouse_release(Modifiers::NONE, 1));
        assert!(list.selected_indices().is_empty());
    }

    #[test]
    fn test_rating_click_commits_without_selecting() {
        let mut list = list(3);
        let ratings = Arc::new(Mutex::new(Vec::new()));
        let ratings_clone = ratings.clone();
        list.rating_changed.connect(move |args| ratings_clone.lock().push(*args));

        // Rating content starts at 100; glyph 2 spans 125..137.
        assert!(list.mouse_press(Point::new(130.0, 24.0 + 20.0 + 5.0), Modifiers::NONE));
        list.mouse_release(Modifiers::NONE, 1);

        assert_eq!(*ratings.lock(), vec![(1, 3)]);
        assert_eq!(list.item_at(1).data().rating(), 3);
        assert_eq!(list.current_index(), Some(1));
        assert!(list.selected_indices().is_empty());
    }

    #[test]
    fn test_rating_hover() {
        let mut list = list(3);
        let hovers = Arc::new(Mutex::new(Vec::new()));
        let hovers_clone = hovers.clone();
        list.hover_changed.connect(move |hover| hovers_clone.lock().push(*hover));

        list.mouse_move(Point::new(114.0, 30.0));
        list.mouse_move(Point::new(114.5, 31.0));
        list.mouse_move(Point::new(50.0, 30.0));
        list.mouse_move(Point::new(140.0, 50.0));
        list.pointer_left();

        assert_eq!(
            *hovers.lock(),
            vec![Some((0, 1)), None, Some((1, 3)), None]
        );
    }

    #[test]
    fn test_drag_reorders_selection() {
        let mut list = list(5);
        let started = Arc::new(Mutex::new(Vec::new()));
        let started_clone = started.clone();
        list.drag_started.connect(move |ids| started_clone.lock().push(ids.clone()));
        let orders = Arc::new(Mutex::new(Vec::new()));
        let orders_clone = orders.clone();
        list.model().reordered.connect(move |ids| orders_clone.lock().push(ids.clone()));

        list.select(1);
        list.select(3);
        list.mouse_press(row_point(3), Modifiers::NONE);
        list.mouse_move(Point::new(50.0, 24.0 + 3.0));
        list.mouse_move(Point::new(50.0, 26.0));
        assert_eq!(list.drag_session().target(), Some(0));
        assert!(list.mouse_release(Modifiers::NONE, 1));

        assert_eq!(*started.lock(), vec![vec![1, 3]]);
        assert_eq!(list.model().ids(), vec![1, 3, 0, 2, 4]);
        assert_eq!(*orders.lock(), vec![vec![1, 3, 0, 2, 4]]);
        assert_eq!(list.current_index(), Some(1));
    }

    #[test]
    fn test_cancel_drag_keeps_order() {
        let mut list = list(4);
        list.mouse_press(row_point(2), Modifiers::NONE);
        list.mouse_move(Point::new(50.0, 30.0));
        assert!(list.drag_session().is_dragging());
        list.cancel_drag();
        assert!(!list.mouse_release(Modifiers::NONE, 1));
        assert_eq!(list.model().ids(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_keyboard_navigation() {
        let mut list = list(10);
        list.key_press(Key::Down, Modifiers::NONE);
        assert_eq!(list.current_index(), Some(1));
        assert_eq!(list.selected_indices(), vec![1]);

        list.key_press(Key::Down, Modifiers::SHIFT);
        list.key_press(Key::Down, Modifiers::SHIFT);
        assert_eq!(list.selected_indices(), vec![1, 2, 3]);

        list.key_press(Key::End, Modifiers::NONE);
        assert_eq!(list.current_index(), Some(9));
        assert_eq!(list.selected_indices(), vec![9]);
        assert_eq!(list.viewport().offset_y, -100.0);

        list.key_press(Key::Home, Modifiers::CONTROL);
        assert_eq!(list.current_index(), Some(0));
        assert_eq!(list.selected_indices(), vec![9]);

        list.key_press(Key::Space, Modifiers::CONTROL);
        assert_eq!(list.selected_indices(), vec![0, 9]);

        list.key_press(Key::Up, Modifiers::NONE);
        assert_eq!(list.current_index(), Some(0));
    }

    #[test]
    fn test_enter_activates_current() {
        let mut list = list(3);
        let activated = Arc::new(Mutex::new(Vec::new()));
        let activated_clone = activated.clone();
        list.activated.connect(move |row| activated_clone.lock().push(*row));
        list.key_press(Key::Down, Modifiers::NONE);
        list.key_press(Key::Enter, Modifiers::NONE);
        assert_eq!(*activated.lock(), vec![1]);
    }

    #[test]
    fn test_repaint_only_on_change() {
        let mut list = list(5);
        list.take_needs_repaint();

        assert!(list.select(2));
        assert!(list.take_needs_repaint());
        assert!(!list.select(2));
        assert!(!list.take_needs_repaint());

        assert!(!list.scroll_to(0.0));
        assert!(!list.take_needs_repaint());
        assert!(list.select_all());
        assert!(list.deselect_all());
        assert!(list.take_needs_repaint());
        assert!(!list.take_needs_repaint());
    }

    #[test]
    fn test_double_click_activates() {
        let mut list = list(4);
        let events = Arc::new(Mutex::new(Vec::new()));
        for (name, signal) in [
            ("clicked", &list.clicked),
            ("double", &list.double_clicked),
            ("triple", &list.triple_clicked),
            ("activated", &list.activated),
        ] {
            let events = events.clone();
            signal.connect(move |row| events.lock().push((name, *row)));
        }

        list.mouse_press(row_point(2), Modifiers::NONE);
        list.mouse_release(Modifiers::NONE, 1);
        list.mouse_press(row_point(2), Modifiers::NONE);
        list.mouse_release(Modifiers::NONE, 2);
        list.mouse_press(row_point(2), Modifiers::NONE);
        list.mouse_release(Modifiers::NONE, 3);

        assert_eq!(
            *events.lock(),
            vec![("clicked", 2), ("double", 2), ("activated", 2), ("triple", 2)]
        );
        assert_eq!(list.selected_indices(), vec![2]);
    }

    #[test]
    fn test_auto_size_first_column_fits_text() {
        let mut list = list(0);
        let item = TextItem::new().with_text(ColumnType::Title, "Hello World");
        list.append(ListItem::new(0, item), false);
        let metrics = MonospaceMetrics::default();

        let width = list.auto_size_column(ColumnType::Title, &metrics).unwrap();
        let lead = SIDE_SPACING / 2.0 + 16.0 + DETAIL_TEXT_SPACING;
        assert_eq!(width, metrics.text_width("Hello World") + SIDE_SPACING + 2.0 + lead);

        let mut painter = DisplayList::new();
        list.paint(Rect::new(0.0, 24.0, 300.0, 20.0), &metrics, &mut painter);
        assert_eq!(painter.texts(), vec!["Hello World"]);
    }

    #[test]
    fn test_page_keys_scroll() {
        let mut list = list(20);
        list.key_press(Key::PageDown, Modifiers::NONE);
        assert_eq!(list.viewport().offset_y, -100.0);
        list.key_press(Key::PageUp, Modifiers::NONE);
        assert_eq!(list.viewport().offset_y, 0.0);
    }

    #[test]
    fn test_header_click_toggles_sort() {
        let mut list = TrackList::new(registry(), SelectionMode::Extended);
        list.add_column(ColumnType::Title, 100.0).unwrap();
        for (id, title) in ["b", "c", "a"].into_iter().enumerate() {
            let item = TextItem::new().with_text(ColumnType::Title, title);
            list.append(ListItem::new(id as i64, item), false);
        }
        let sorts = Arc::new(Mutex::new(Vec::new()));
        let sorts_clone = sorts.clone();
        list.sort_changed.connect(move |sort| sorts_clone.lock().push(*sort));

        list.header_clicked(ColumnType::Title);
        assert_eq!(list.model().ids(), vec![2, 0, 1]);
        list.header_clicked(ColumnType::Title);
        assert_eq!(list.model().ids(), vec![1, 0, 2]);
        assert_eq!(list.get_sort(), Some((ColumnType::Title, SortOrder::Descending)));
        list.clear_sort();
        assert_eq!(list.get_sort(), None);
        assert_eq!(
            *sorts.lock(),
            vec![
                Some((ColumnType::Title, SortOrder::Ascending)),
                Some((ColumnType::Title, SortOrder::Descending)),
                None,
            ]
        );
    }

    #[test]
    fn test_rubber_band() {
        let mut list = list(10);
        assert!(list.select_in_rectangle(Rect::new(10.0, 50.0, 40.0, 30.0)));
        assert_eq!(list.selected_indices(), vec![1, 2]);
        assert!(!list.select_in_rectangle(Rect::new(250.0, 50.0, 40.0, 30.0)));
    }

    #[test]
    fn test_paint_rows_and_background() {
        let mut list = list(3);
        list.set_active(Some(1));
        list.select(2);
        let metrics = MonospaceMetrics::default();
        let mut painter = DisplayList::new();

        let range = list.paint(Rect::new(0.0, 0.0, 300.0, 124.0), &metrics, &mut painter);
        assert_eq!(range, Some((0, 2)));
        assert_eq!(painter.texts(), vec!["Track 0", "Track 1", "Track 2"]);

        let fills: Vec<_> = painter
            .commands()
            .iter()
            .filter_map(|c| match c {
                PaintCommand::FillRect { rect, color } => Some((*rect, *color)),
                _ => None,
            })
            .collect();
        let palette = list.palette();
        assert_eq!(fills[0].1, palette.background);
        assert_eq!(fills[1].1, palette.active_background);
        assert_eq!(fills[2].1, palette.selection_background);
        // Rows end at 84; the rest of the rect is background.
        assert_eq!(fills[3], (Rect::new(0.0, 84.0, 300.0, 40.0), palette.background));
        assert!(painter.commands().iter().any(|c| matches!(
            c,
            PaintCommand::Decoration { decoration: Decoration::Playing, .. }
        )));
    }

    #[test]
    fn test_paint_truncates_and_clips() {
        let mut list = list(0);
        let long = TextItem::new().with_text(ColumnType::Title, "A very long title indeed");
        list.append(ListItem::new(0, long), false);
        let metrics = MonospaceMetrics::default();
        let mut painter = DisplayList::new();
        list.paint(Rect::new(0.0, 24.0, 300.0, 20.0), &metrics, &mut painter);

        // Title content: x 20, space 80, available 76 -> 9 graphemes + ellipsis.
        let text = painter
            .commands()
            .iter()
            .find_map(|c| match c {
                PaintCommand::Text { text, origin, clip, .. } => Some((text.clone(), *origin, *clip)),
                _ => None,
            })
            .unwrap();
        assert_eq!(text.0, "A very lo…");
        assert_eq!(text.1.x, 22.0);
        assert_eq!(text.2, Some(Rect::new(20.0, 24.0, 80.0, 20.0)));
    }

    #[test]
    fn test_paint_rating_preview() {
        let mut list = list(2);
        list.model.item_data_mut(0).set_rating(4);
        list.mouse_move(Point::new(114.0, 50.0));
        let metrics = MonospaceMetrics::default();
        let mut painter = DisplayList::new();
        list.paint(Rect::new(0.0, 24.0, 300.0, 40.0), &metrics, &mut painter);
        // Row 0 shows its rating; row 1 previews two of five.
        assert_eq!(
            painter.glyphs(),
            vec![true, true, true, true, true, true, false, false, false]
        );
    }
}
