//! Column descriptors, the comparator registry, and the column model.
//!
//! Column kinds form a closed set ([`ColumnType`]). What a column sorts by and
//! how it renders is looked up once, at configuration time, from a
//! [`ColumnRegistry`] that the data-supplying collaborator fills in.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracklist_core::Signal;
use tracklist_core::logging::targets;

use super::item::TrackItem;
use crate::widget::{DETAIL_TEXT_SPACING, RatingGeometry, SIDE_SPACING, TextMetrics};

/// Columns never shrink below this width, in pixels.
pub const MIN_COLUMN_WIDTH: f32 = 20.0;

/// Width given to columns that do not specify one.
pub const DEFAULT_COLUMN_WIDTH: f32 = 60.0;

/// The closed set of column kinds a track list can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Queue,
    Track,
    Title,
    Album,
    Artist,
    Time,
    Tag,
    Bitrate,
    Rating,
    Year,
    Disc,
    AlbumArtist,
    Playcount,
    Playdate,
    Filename,
    Filetype,
    Composer,
    Conductor,
    Date,
    Status,
}

impl ColumnType {
    /// Every column type, in declaration order.
    pub const ALL: [ColumnType; 20] = [
        ColumnType::Queue,
        ColumnType::Track,
        ColumnType::Title,
        ColumnType::Album,
        ColumnType::Artist,
        ColumnType::Time,
        ColumnType::Tag,
        ColumnType::Bitrate,
        ColumnType::Rating,
        ColumnType::Year,
        ColumnType::Disc,
        ColumnType::AlbumArtist,
        ColumnType::Playcount,
        ColumnType::Playdate,
        ColumnType::Filename,
        ColumnType::Filetype,
        ColumnType::Composer,
        ColumnType::Conductor,
        ColumnType::Date,
        ColumnType::Status,
    ];

    /// Stable name, as used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            ColumnType::Queue => "queue",
            ColumnType::Track => "track",
            ColumnType::Title => "title",
            ColumnType::Album => "album",
            ColumnType::Artist => "artist",
            ColumnType::Time => "time",
            ColumnType::Tag => "tag",
            ColumnType::Bitrate => "bitrate",
            ColumnType::Rating => "rating",
            ColumnType::Year => "year",
            ColumnType::Disc => "disc",
            ColumnType::AlbumArtist => "album_artist",
            ColumnType::Playcount => "playcount",
            ColumnType::Playdate => "playdate",
            ColumnType::Filename => "filename",
            ColumnType::Filetype => "filetype",
            ColumnType::Composer => "composer",
            ColumnType::Conductor => "conductor",
            ColumnType::Date => "date",
            ColumnType::Status => "status",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.name() == name)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a column's cells are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellRenderer {
    /// Text from [`TrackItem::column_data`], truncated and justified.
    #[default]
    Text,
    /// The inline rating glyphs, with hover preview and click-to-commit.
    Rating,
}

/// An ordering over item payloads.
pub type Comparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// Registry entry describing one column kind.
pub struct ColumnSpec<T> {
    pub label: String,
    pub ascending: Option<Comparator<T>>,
    pub descending: Option<Comparator<T>>,
    pub renderer: CellRenderer,
}

impl<T> ColumnSpec<T> {
    /// A text column with no ordering.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ascending: None,
            descending: None,
            renderer: CellRenderer::Text,
        }
    }

    /// Sets both comparators explicitly.
    pub fn with_comparators(
        mut self,
        ascending: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static,
        descending: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    ) -> Self {
        self.ascending = Some(Arc::new(ascending));
        self.descending = Some(Arc::new(descending));
        self
    }

    /// Orders by a key; descending is the reverse of ascending.
    pub fn with_key_order<K: Ord + 'static>(
        self,
        key: impl Fn(&T) -> K + Send + Sync + 'static,
    ) -> Self
    where
        T: 'static,
    {
        let key = Arc::new(key);
        let asc_key = Arc::clone(&key);
        self.with_comparators(
            move |a, b| asc_key(a).cmp(&asc_key(b)),
            move |a, b| key(b).cmp(&key(a)),
        )
    }

    pub fn with_renderer(mut self, renderer: CellRenderer) -> Self {
        self.renderer = renderer;
        self
    }
}

impl<T> Clone for ColumnSpec<T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            ascending: self.ascending.clone(),
            descending: self.descending.clone(),
            renderer: self.renderer,
        }
    }
}

impl<T> fmt::Debug for ColumnSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSpec")
            .field("label", &self.label)
            .field("sortable", &self.ascending.is_some())
            .field("renderer", &self.renderer)
            .finish()
    }
}

/// Maps column types to their comparators and renderer policy.
pub struct ColumnRegistry<T> {
    specs: HashMap<ColumnType, ColumnSpec<T>>,
}

impl<T> Default for ColumnRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ColumnRegistry<T> {
    pub fn new() -> Self {
        Self {
            specs: HashMap::new(),
        }
    }

    /// Registers (or replaces) the entry for `column`.
    pub fn register(&mut self, column: ColumnType, spec: ColumnSpec<T>) -> &mut Self {
        self.specs.insert(column, spec);
        self
    }

    pub fn with(mut self, column: ColumnType, spec: ColumnSpec<T>) -> Self {
        self.register(column, spec);
        self
    }

    pub fn get(&self, column: ColumnType) -> Option<&ColumnSpec<T>> {
        self.specs.get(&column)
    }

    pub fn contains(&self, column: ColumnType) -> bool {
        self.specs.contains_key(&column)
    }

    /// Registered types in declaration order.
    pub fn types(&self) -> Vec<ColumnType> {
        ColumnType::ALL
            .into_iter()
            .filter(|ty| self.specs.contains_key(ty))
            .collect()
    }
}

impl<T> Clone for ColumnRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            specs: self.specs.clone(),
        }
    }
}

/// A column installed in a list.
pub struct Column<T> {
    pub column_type: ColumnType,
    pub width: f32,
    pub display_index: usize,
    pub visible: bool,
    pub spec: ColumnSpec<T>,
}

impl<T> Column<T> {
    pub fn label(&self) -> &str {
        &self.spec.label
    }

    pub fn renderer(&self) -> CellRenderer {
        self.spec.renderer
    }

    pub fn is_sortable(&self) -> bool {
        self.spec.ascending.is_some()
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("column_type", &self.column_type)
            .field("width", &self.width)
            .field("display_index", &self.display_index)
            .field("visible", &self.visible)
            .finish()
    }
}

/// The ordered set of columns of one list.
///
/// Columns are kept in insertion order; what the user sees is ordered by
/// `display_index` among the visible ones.
///
/// # Signals
///
/// - `column_resized`: (column, new width)
/// - `column_moved`: (column, new display index)
/// - `column_visibility_changed`: (column, visible)
pub struct ColumnModel<T> {
    columns: Vec<Column<T>>,

    pub column_resized: Signal<(ColumnType, f32)>,
    pub column_moved: Signal<(ColumnType, usize)>,
    pub column_visibility_changed: Signal<(ColumnType, bool)>,
}

impl<T> Default for ColumnModel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ColumnModel<T> {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            column_resized: Signal::new(),
            column_moved: Signal::new(),
            column_visibility_changed: Signal::new(),
        }
    }

    /// Adds a visible column at the end of the display order.
    ///
    /// # Panics
    ///
    /// Panics if a column of the same type is already installed.
    #[track_caller]
    pub fn add_column(&mut self, column_type: ColumnType, spec: ColumnSpec<T>, width: f32) {
        assert!(
            self.column(column_type).is_none(),
            "add_column: column '{column_type}' already installed"
        );
        let display_index = self.columns.len();
        self.columns.push(Column {
            column_type,
            width: width.max(MIN_COLUMN_WIDTH),
            display_index,
            visible: true,
            spec,
        });
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, column_type: ColumnType) -> Option<&Column<T>> {
        self.columns.iter().find(|c| c.column_type == column_type)
    }

    fn column_mut(&mut self, column_type: ColumnType) -> Option<&mut Column<T>> {
        self.columns.iter_mut().find(|c| c.column_type == column_type)
    }

    /// All columns in display order, hidden ones included.
    pub fn columns(&self) -> Vec<&Column<T>> {
        let mut columns: Vec<&Column<T>> = self.columns.iter().collect();
        columns.sort_by_key(|c| c.display_index);
        columns
    }

    /// Visible columns in display order.
    pub fn visible_columns(&self) -> Vec<&Column<T>> {
        let mut columns: Vec<&Column<T>> = self.columns.iter().filter(|c| c.visible).collect();
        columns.sort_by_key(|c| c.display_index);
        columns
    }

    pub fn first_visible(&self) -> Option<ColumnType> {
        self.visible_columns().first().map(|c| c.column_type)
    }

    /// Resizes a column. Returns false if it is not installed or the width is
    /// unchanged.
    pub fn set_width(&mut self, column_type: ColumnType, width: f32) -> bool {
        let width = width.max(MIN_COLUMN_WIDTH);
        let Some(column) = self.column_mut(column_type) else {
            return false;
        };
        if column.width == width {
            return false;
        }
        column.width = width;
        tracing::debug!(target: targets::PAINT, column = %column_type, width, "column resized");
        self.column_resized.emit((column_type, width));
        true
    }

    pub fn set_visible(&mut self, column_type: ColumnType, visible: bool) -> bool {
        let Some(column) = self.column_mut(column_type) else {
            return false;
        };
        if column.visible == visible {
            return false;
        }
        column.visible = visible;
        self.column_visibility_changed.emit((column_type, visible));
        true
    }

    /// Moves a column to `to` in the display order and renumbers every
    /// column densely.
    pub fn move_column(&mut self, column_type: ColumnType, to: usize) -> bool {
        let mut order: Vec<ColumnType> = self.columns().iter().map(|c| c.column_type).collect();
        let Some(from) = order.iter().position(|&ty| ty == column_type) else {
            return false;
        };
        let to = to.min(order.len() - 1);
        if from == to {
            return false;
        }
        let ty = order.remove(from);
        order.insert(to, ty);
        for (display_index, ty) in order.into_iter().enumerate() {
            if let Some(column) = self.column_mut(ty) {
                column.display_index = display_index;
            }
        }
        self.column_moved.emit((column_type, to));
        true
    }

    /// Visible column under `x`, measured from the left edge of the first
    /// visible column.
    pub fn column_at(&self, x: f32) -> Option<ColumnType> {
        if x < 0.0 {
            return None;
        }
        let mut left = 0.0;
        for column in self.visible_columns() {
            if x < left + column.width {
                return Some(column.column_type);
            }
            left += column.width;
        }
        None
    }

    /// Left edge of a visible column.
    pub fn column_offset(&self, column_type: ColumnType) -> Option<f32> {
        let mut left = 0.0;
        for column in self.visible_columns() {
            if column.column_type == column_type {
                return Some(left);
            }
            left += column.width;
        }
        None
    }

    pub fn total_width(&self) -> f32 {
        self.columns.iter().filter(|c| c.visible).map(|c| c.width).sum()
    }

    /// Fits a column to its content. Returns the new width.
    ///
    /// Rating columns fit the full glyph strip. Text columns fit the widest
    /// cell among `items`; with no cells they keep their width. The first
    /// visible column also makes room for the `icon_width` icon area.
    pub fn auto_size<'a>(
        &mut self,
        column_type: ColumnType,
        metrics: &dyn TextMetrics,
        rating: &RatingGeometry,
        icon_width: f32,
        items: impl Iterator<Item = &'a T>,
    ) -> Option<f32>
    where
        T: TrackItem + 'a,
    {
        let renderer = self.column(column_type)?.renderer();
        let content = match renderer {
            CellRenderer::Rating => Some(rating.natural_width()),
            CellRenderer::Text => items
                .filter_map(|item| item.column_data(column_type))
                .map(|cell| metrics.text_width(&cell.text))
                .reduce(f32::max),
        };
        if let Some(content) = content {
            let mut width = content + SIDE_SPACING + 2.0;
            if self.first_visible() == Some(column_type) {
                width += icon_width + DETAIL_TEXT_SPACING + SIDE_SPACING / 2.0;
            }
            self.set_width(column_type, width);
        }
        self.column(column_type).map(|c| c.width)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::model::item::TextItem;
    use crate::widget::MonospaceMetrics;

    fn model() -> ColumnModel<TextItem> {
        let mut model = ColumnModel::new();
        model.add_column(ColumnType::Track, ColumnSpec::new("#"), 30.0);
        model.add_column(ColumnType::Title, ColumnSpec::new("Title"), 100.0);
        model.add_column(ColumnType::Artist, ColumnSpec::new("Artist"), 80.0);
        model
    }

    #[test]
    fn test_column_type_names() {
        for ty in ColumnType::ALL {
            assert_eq!(ColumnType::from_name(ty.name()), Some(ty));
        }
        assert_eq!(ColumnType::AlbumArtist.to_string(), "album_artist");
        assert_eq!(ColumnType::from_name("genre"), None);
    }

    #[test]
    fn test_hit_testing_and_offsets() {
        let model = model();
        assert_eq!(model.column_at(-1.0), None);
        assert_eq!(model.column_at(0.0), Some(ColumnType::Track));
        assert_eq!(model.column_at(30.0), Some(ColumnType::Title));
        assert_eq!(model.column_at(209.0), Some(ColumnType::Artist));
        assert_eq!(model.column_at(210.0), None);
        assert_eq!(model.column_offset(ColumnType::Artist), Some(130.0));
        assert_eq!(model.total_width(), 210.0);
    }

    #[test]
    fn test_move_renumbers_display_order() {
        let mut model = model();
        let moves = Arc::new(Mutex::new(Vec::new()));
        let moves_clone = moves.clone();
        model.column_moved.connect(move |args| moves_clone.lock().push(*args));

        assert!(model.move_column(ColumnType::Artist, 0));
        let order: Vec<_> = model.visible_columns().iter().map(|c| c.column_type).collect();
        assert_eq!(order, vec![ColumnType::Artist, ColumnType::Track, ColumnType::Title]);
        let indices: Vec<_> = model.columns().iter().map(|c| c.display_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(*moves.lock(), vec![(ColumnType::Artist, 0)]);

        assert!(!model.move_column(ColumnType::Artist, 0));
        assert!(!model.move_column(ColumnType::Year, 1));
    }

    #[test]
    fn test_hidden_columns_are_skipped() {
        let mut model = model();
        assert!(model.set_visible(ColumnType::Track, false));
        assert!(!model.set_visible(ColumnType::Track, false));
        assert_eq!(model.column_at(0.0), Some(ColumnType::Title));
        assert_eq!(model.column_offset(ColumnType::Track), None);
        assert_eq!(model.total_width(), 180.0);
        assert_eq!(model.first_visible(), Some(ColumnType::Title));
    }

    #[test]
    fn test_width_has_minimum() {
        let mut model = model();
        assert!(model.set_width(ColumnType::Title, 5.0));
        assert_eq!(model.column(ColumnType::Title).unwrap().width, MIN_COLUMN_WIDTH);
        assert!(!model.set_width(ColumnType::Title, 1.0));
    }

    #[test]
    fn test_key_order_comparators() {
        let spec: ColumnSpec<i32> = ColumnSpec::new("n").with_key_order(|n: &i32| *n);
        let asc = spec.ascending.clone().unwrap();
        let desc = spec.descending.clone().unwrap();
        assert_eq!(asc(&1, &2), Ordering::Less);
        assert_eq!(desc(&1, &2), Ordering::Greater);
    }

    #[test]
    fn test_auto_size() {
        let mut model = model();
        model.add_column(
            ColumnType::Rating,
            ColumnSpec::new("Rating").with_renderer(CellRenderer::Rating),
            40.0,
        );
        let metrics = MonospaceMetrics::new(7.0, 14.0, 11.0);
        let rating = RatingGeometry::default();
        let items = vec![
            TextItem::new().with_text(ColumnType::Title, "Blue"),
            TextItem::new().with_text(ColumnType::Title, "Long Title"),
        ];

        let width = model.auto_size(ColumnType::Title, &metrics, &rating, 16.0, items.iter());
        assert_eq!(width, Some(70.0 + SIDE_SPACING + 2.0));

        let width = model.auto_size(ColumnType::Rating, &metrics, &rating, 16.0, items.iter());
        assert_eq!(width, Some(5.0 * 12.0 + SIDE_SPACING + 2.0));

        // No cells: width unchanged.
        let width = model.auto_size(ColumnType::Artist, &metrics, &rating, 16.0, items.iter());
        assert_eq!(width, Some(80.0));

        let width = model.auto_size(ColumnType::Track, &metrics, &rating, 16.0, items.iter());
        assert_eq!(width, Some(30.0));
    }

    #[test]
    fn test_auto_size_first_column_reserves_icon_area() {
        let mut model = model();
        let metrics = MonospaceMetrics::new(7.0, 14.0, 11.0);
        let rating = RatingGeometry::default();
        let items = vec![TextItem::new().with_text(ColumnType::Track, "12")];

        let width = model.auto_size(ColumnType::Track, &metrics, &rating, 16.0, items.iter());
        let expected = 14.0 + SIDE_SPACING + 2.0 + 16.0 + DETAIL_TEXT_SPACING + SIDE_SPACING / 2.0;
        assert_eq!(width, Some(expected));

        model.set_visible(ColumnType::Track, false);
        let width = model.auto_size(ColumnType::Title, &metrics, &rating, 16.0, items.iter());
        assert_eq!(width, Some(100.0));
    }
}
