//! Items held by the list and the data they expose to columns.
//!
//! The list never interprets item payloads. It only asks a [`TrackItem`]
//! for the text to show in a given column, an optional icon, and a rating;
//! everything else (ordering, persistence) is supplied by collaborators.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use super::column::ColumnType;

/// Caller-assigned item identifier.
///
/// The engine does not require ids to be unique, but lookups such as
/// [`find_by_id`](crate::model::TrackModel::find_by_id) return the first match.
pub type ItemId = i64;

/// Per-item state bits.
///
/// The list owns `SELECTED` and `FOCUSED`; the remaining bits are set by
/// collaborators and only read by the list (drag eligibility, paint style).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ItemState(u8);

impl ItemState {
    /// The item is part of the selection.
    pub const SELECTED: Self = Self(0x01);
    /// The item is the current item and the list has keyboard focus.
    pub const FOCUSED: Self = Self(0x02);
    /// The item may be picked up by a drag.
    pub const DRAGGABLE: Self = Self(0x04);
    /// The item cannot be played.
    pub const NOT_PLAYABLE: Self = Self(0x08);
    /// The item is drawn with the shaded text color.
    pub const SHADED: Self = Self(0x10);

    /// No bits set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Raw bit value.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns true if every bit in `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Sets the bits in `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clears the bits in `other`.
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Sets or clears the bits in `other`.
    pub fn set(&mut self, other: Self, on: bool) {
        if on {
            self.insert(other);
        } else {
            self.remove(other);
        }
    }
}

impl BitOr for ItemState {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ItemState {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(ItemState, &str); 5] = [
            (ItemState::SELECTED, "SELECTED"),
            (ItemState::FOCUSED, "FOCUSED"),
            (ItemState::DRAGGABLE, "DRAGGABLE"),
            (ItemState::NOT_PLAYABLE, "NOT_PLAYABLE"),
            (ItemState::SHADED, "SHADED"),
        ];
        let set: Vec<&str> = NAMES
            .iter()
            .filter(|(bit, _)| self.contains(*bit))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "ItemState({})", set.join(" | "))
    }
}

/// How a cell's text is placed horizontally within its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justify {
    /// Left-aligned.
    #[default]
    Normal,
    /// A block as wide as the column-wide maximum is centered in the cell and
    /// the value is right-aligned inside that block.
    CenterRightAligned,
    /// The value is right-aligned against the column-wide maximum width and
    /// that block is left-aligned in the cell.
    LeftRightAligned,
    /// Flush right within the cell.
    Right,
}

/// Text for one cell plus its placement policy.
#[derive(Debug, Clone, PartialEq)]
pub struct CellData {
    /// The text to display.
    pub text: String,
    /// Horizontal placement.
    pub justify: Justify,
    /// Width hint of the widest value in this column, in pixels.
    ///
    /// Only consulted by the aligned justification modes.
    pub max_width: f32,
}

impl CellData {
    /// Left-aligned text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            justify: Justify::Normal,
            max_width: 0.0,
        }
    }

    /// Sets the justification and its column-wide max width hint.
    pub fn with_justify(mut self, justify: Justify, max_width: f32) -> Self {
        self.justify = justify;
        self.max_width = max_width;
        self
    }
}

/// Opaque reference to an icon owned by the theming collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IconRef(pub u32);

/// Capability every item payload provides to the list.
pub trait TrackItem {
    /// Returns the cell for `column`, or `None` to leave it blank.
    fn column_data(&self, column: ColumnType) -> Option<CellData>;

    /// Optional icon drawn in the leading icon area.
    fn icon(&self) -> Option<IconRef> {
        None
    }

    /// Current rating, drawn by rating columns.
    fn rating(&self) -> u8 {
        0
    }

    /// Stores a rating committed by a click in a rating column.
    ///
    /// The default ignores the value; collaborators persist it from the
    /// `rating_changed` notification either way.
    fn set_rating(&mut self, _rating: u8) {}
}

/// A simple payload holding prepared cell texts.
///
/// Useful for lists whose rows are already formatted, such as plain file
/// listings, and in tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextItem {
    cells: Vec<(ColumnType, CellData)>,
    rating: u8,
    icon: Option<IconRef>,
}

impl TextItem {
    /// Creates an item with no cells.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a left-aligned cell.
    pub fn with_text(self, column: ColumnType, text: impl Into<String>) -> Self {
        self.with_cell(column, CellData::new(text))
    }

    /// Adds a cell, replacing any previous cell for the same column.
    pub fn with_cell(mut self, column: ColumnType, cell: CellData) -> Self {
        self.cells.retain(|(c, _)| *c != column);
        self.cells.push((column, cell));
        self
    }

    /// Sets the rating.
    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = rating;
        self
    }

    /// Sets the icon.
    pub fn with_icon(mut self, icon: IconRef) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Returns the text of a cell, if present.
    pub fn text(&self, column: ColumnType) -> Option<&str> {
        self.cells
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, cell)| cell.text.as_str())
    }
}

impl TrackItem for TextItem {
    fn column_data(&self, column: ColumnType) -> Option<CellData> {
        self.cells
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, cell)| cell.clone())
    }

    fn icon(&self) -> Option<IconRef> {
        self.icon
    }

    fn rating(&self) -> u8 {
        self.rating
    }

    fn set_rating(&mut self, rating: u8) {
        self.rating = rating;
    }
}

/// An entry in the item store: id, state bits, and payload.
pub struct ListItem<T> {
    pub(crate) id: ItemId,
    pub(crate) state: ItemState,
    pub(crate) data: T,
    /// Identity assigned by the store on insertion; survives reordering.
    pub(crate) key: u64,
}

impl<T> ListItem<T> {
    /// Creates a draggable entry.
    pub fn new(id: ItemId, data: T) -> Self {
        Self {
            id,
            state: ItemState::DRAGGABLE,
            data,
            key: 0,
        }
    }

    /// Replaces the collaborator-owned state bits (draggable, not playable,
    /// shaded). Selection and focus bits in `state` are ignored.
    pub fn with_flags(mut self, state: ItemState) -> Self {
        let owned = self.state.bits() & (ItemState::SELECTED.bits() | ItemState::FOCUSED.bits());
        let external = state.bits() & !(ItemState::SELECTED.bits() | ItemState::FOCUSED.bits());
        self.state = ItemState(owned | external);
        self
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn state(&self) -> ItemState {
        self.state
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    /// Consumes the entry, returning its payload.
    pub fn into_data(self) -> T {
        self.data
    }

    pub fn is_selected(&self) -> bool {
        self.state.contains(ItemState::SELECTED)
    }

    pub fn has_focus(&self) -> bool {
        self.state.contains(ItemState::FOCUSED)
    }

    pub fn is_draggable(&self) -> bool {
        self.state.contains(ItemState::DRAGGABLE)
    }

    pub fn is_playable(&self) -> bool {
        !self.state.contains(ItemState::NOT_PLAYABLE)
    }

    pub fn is_shaded(&self) -> bool {
        self.state.contains(ItemState::SHADED)
    }
}

impl<T: fmt::Debug> fmt::Debug for ListItem<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListItem")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("data", &self.data)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_state_bits() {
        let mut state = ItemState::empty();
        state.insert(ItemState::SELECTED | ItemState::SHADED);
        assert!(state.contains(ItemState::SELECTED));
        assert!(state.contains(ItemState::SHADED));
        assert!(!state.contains(ItemState::FOCUSED));

        state.set(ItemState::SELECTED, false);
        assert_eq!(state.bits(), 0x10);
        assert_eq!(format!("{state:?}"), "ItemState(SHADED)");
    }

    #[test]
    fn test_new_item_is_draggable_and_playable() {
        let item = ListItem::new(7, ());
        assert_eq!(item.id(), 7);
        assert!(item.is_draggable());
        assert!(item.is_playable());
        assert!(!item.is_selected());
    }

    #[test]
    fn test_with_flags_keeps_list_owned_bits() {
        let mut item = ListItem::new(1, ());
        item.state.insert(ItemState::SELECTED);
        let item = item.with_flags(ItemState::SHADED | ItemState::FOCUSED);
        assert!(item.is_selected());
        assert!(item.is_shaded());
        assert!(!item.is_draggable());
        assert!(!item.has_focus());
    }

    #[test]
    fn test_text_item_cells() {
        let mut item = TextItem::new()
            .with_text(ColumnType::Title, "Intro")
            .with_cell(
                ColumnType::Track,
                CellData::new("3").with_justify(Justify::LeftRightAligned, 14.0),
            )
            .with_rating(2);

        assert_eq!(item.text(ColumnType::Title), Some("Intro"));
        let track = item.column_data(ColumnType::Track).unwrap();
        assert_eq!(track.justify, Justify::LeftRightAligned);
        assert_eq!(track.max_width, 14.0);
        assert!(item.column_data(ColumnType::Album).is_none());

        item.set_rating(5);
        assert_eq!(item.rating(), 5);
    }
}
