//! The list state: item store, tracked indices, and their notifications.
//!
//! [`TrackModel`] owns the items and the anchor/current/extent/active
//! indices. Lifecycle operations live here; selection, sorting, and batch
//! reordering extend it from their own modules.

use tracklist_core::Signal;
use tracklist_core::logging::targets;

use super::item::{ItemId, ItemState, ListItem};
use super::selection::SelectionMode;
use super::store::{ItemStore, TrackedIndices};

/// Items plus the list state derived from them.
///
/// # Signals
///
/// - `selected` / `deselected`: an item's SELECTED bit flipped
/// - `current_changed`: (new, old) current index
/// - `active_changed`: (new, old) active index
/// - `inserted`, `removed`, `replaced`: index of the affected item
/// - `moved`: (old, new) index of a relocated item
/// - `cleared`: the store was emptied
/// - `reordered`: item ids in their new order after a drop
pub struct TrackModel<T> {
    pub(crate) store: ItemStore<T>,
    pub(crate) tracked: TrackedIndices,
    pub(crate) mode: SelectionMode,
    pub(crate) has_focus: bool,

    pub selected: Signal<usize>,
    pub deselected: Signal<usize>,
    pub current_changed: Signal<(Option<usize>, Option<usize>)>,
    pub active_changed: Signal<(Option<usize>, Option<usize>)>,
    pub inserted: Signal<usize>,
    pub removed: Signal<usize>,
    pub replaced: Signal<usize>,
    pub moved: Signal<(usize, usize)>,
    pub cleared: Signal<()>,
    pub reordered: Signal<Vec<ItemId>>,
}

impl<T> Default for TrackModel<T> {
    fn default() -> Self {
        Self::new(SelectionMode::default())
    }
}

impl<T> TrackModel<T> {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            store: ItemStore::new(),
            tracked: TrackedIndices::default(),
            mode,
            has_focus: false,
            selected: Signal::new(),
            deselected: Signal::new(),
            current_changed: Signal::new(),
            active_changed: Signal::new(),
            inserted: Signal::new(),
            removed: Signal::new(),
            replaced: Signal::new(),
            moved: Signal::new(),
            cleared: Signal::new(),
            reordered: Signal::new(),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn item_count(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[track_caller]
    pub fn item_at(&self, index: usize) -> &ListItem<T> {
        self.store.at(index)
    }

    /// Mutable access to an item's payload.
    #[track_caller]
    pub fn item_data_mut(&mut self, index: usize) -> &mut T {
        &mut self.store.at_mut(index).data
    }

    pub fn items(&self) -> impl Iterator<Item = &ListItem<T>> {
        self.store.iter()
    }

    /// Item ids in index order.
    pub fn ids(&self) -> Vec<ItemId> {
        self.store.iter().map(|item| item.id).collect()
    }

    pub fn find_by_id(&self, id: ItemId) -> Option<usize> {
        self.store.find_by_id(id)
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn anchor_index(&self) -> Option<usize> {
        self.tracked.anchor
    }

    pub fn current_index(&self) -> Option<usize> {
        self.tracked.current
    }

    pub fn extent_index(&self) -> Option<usize> {
        self.tracked.extent
    }

    pub fn active(&self) -> Option<usize> {
        self.tracked.active
    }

    pub fn tracked(&self) -> TrackedIndices {
        self.tracked
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    #[track_caller]
    pub(crate) fn check_index(&self, index: usize, operation: &str) {
        assert!(
            index < self.store.len(),
            "{operation}: index {index} out of range (len {})",
            self.store.len()
        );
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Inserts `item` before `index`.
    ///
    /// Inserting into an empty list makes the new item current.
    #[track_caller]
    pub fn insert(&mut self, index: usize, item: ListItem<T>, notify: bool) {
        self.store.insert(index, item);
        self.tracked.on_insert(index);
        tracing::debug!(target: targets::STORE, index, len = self.store.len(), "item inserted");
        if notify {
            self.inserted.emit(index);
        }
        if self.tracked.current.is_none() && self.store.len() == 1 {
            self.set_current(Some(0), notify);
        }
    }

    pub fn append(&mut self, item: ListItem<T>, notify: bool) {
        let index = self.store.len();
        self.insert(index, item, notify);
    }

    /// Replaces the payload at `index`, returning the old one.
    ///
    /// The replacement inherits the selection and focus bits and the identity
    /// of the old item, so tracked indices keep pointing at it.
    #[track_caller]
    pub fn replace(&mut self, index: usize, mut item: ListItem<T>, notify: bool) -> T {
        self.check_index(index, "replace");
        let slot = self.store.at_mut(index);
        for bit in [ItemState::SELECTED, ItemState::FOCUSED] {
            item.state.set(bit, slot.state.contains(bit));
        }
        item.key = slot.key;
        let old = std::mem::replace(slot, item);
        if notify {
            self.replaced.emit(index);
        }
        old.data
    }

    /// Removes the item at `index`, returning its payload.
    ///
    /// Tracked indices that pointed at the item become `None`. In Browse mode,
    /// removing the selected item selects the item that took its place.
    #[track_caller]
    pub fn remove(&mut self, index: usize, notify: bool) -> T {
        self.check_index(index, "remove");
        if notify {
            self.removed.emit(index);
        }
        let item = self.store.remove(index);
        self.tracked.on_remove(index);
        tracing::debug!(target: targets::STORE, index, len = self.store.len(), "item removed");

        if self.mode == SelectionMode::Browse && item.is_selected() && !self.store.is_empty() {
            let replacement = index.min(self.store.len() - 1);
            self.set_current(Some(replacement), notify);
            self.select(replacement);
        }
        item.data
    }

    /// Relocates the item at `old` to `new`.
    #[track_caller]
    pub fn move_item(&mut self, new: usize, old: usize, notify: bool) {
        self.store.move_item(new, old);
        if new == old {
            return;
        }
        self.tracked.on_move(old, new);
        tracing::trace!(target: targets::STORE, old, new, "item moved");
        if notify {
            self.moved.emit((old, new));
        }
    }

    /// Removes every item, notifying `removed` in reverse index order.
    pub fn clear(&mut self, notify: bool) {
        let len = self.store.len();
        if notify {
            for index in (0..len).rev() {
                self.removed.emit(index);
            }
        }
        self.store.clear();
        self.tracked.clear();
        tracing::debug!(target: targets::STORE, removed = len, "list cleared");
        if notify {
            self.cleared.emit(());
        }
    }

    // =========================================================================
    // Active item and focus
    // =========================================================================

    /// Marks the playing row, or clears it with `None`.
    #[track_caller]
    pub fn set_active(&mut self, index: Option<usize>) {
        if let Some(index) = index {
            self.check_index(index, "set_active");
        }
        let old = self.tracked.active;
        if old != index {
            self.tracked.active = index;
            self.active_changed.emit((index, old));
        }
    }

    /// The list gained keyboard focus; the current item shows it.
    pub fn focus_in(&mut self) {
        self.has_focus = true;
        if let Some(current) = self.tracked.current {
            self.store.at_mut(current).state.insert(ItemState::FOCUSED);
        }
    }

    pub fn focus_out(&mut self) {
        self.has_focus = false;
        if let Some(current) = self.tracked.current {
            self.store.at_mut(current).state.remove(ItemState::FOCUSED);
        }
    }

    // =========================================================================
    // Collaborator-owned flags
    // =========================================================================

    #[track_caller]
    pub fn is_draggable(&self, index: usize) -> bool {
        self.store.at(index).is_draggable()
    }

    #[track_caller]
    pub fn set_draggable(&mut self, index: usize, draggable: bool) {
        self.store.at_mut(index).state.set(ItemState::DRAGGABLE, draggable);
    }

    #[track_caller]
    pub fn is_playable(&self, index: usize) -> bool {
        self.store.at(index).is_playable()
    }

    #[track_caller]
    pub fn set_playable(&mut self, index: usize, playable: bool) {
        self.store.at_mut(index).state.set(ItemState::NOT_PLAYABLE, !playable);
    }

    #[track_caller]
    pub fn is_shaded(&self, index: usize) -> bool {
        self.store.at(index).is_shaded()
    }

    #[track_caller]
    pub fn set_shaded(&mut self, index: usize, shaded: bool) {
        self.store.at_mut(index).state.set(ItemState::SHADED, shaded);
    }

    #[track_caller]
    pub fn has_item_focus(&self, index: usize) -> bool {
        self.store.at(index).has_focus()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    fn model_with(mode: SelectionMode, n: i64) -> TrackModel<i64> {
        let mut model = TrackModel::new(mode);
        for id in 0..n {
            model.append(ListItem::new(id, id), false);
        }
        model
    }

    #[test]
    fn test_first_insert_becomes_current() {
        let mut model = TrackModel::new(SelectionMode::Extended);
        model.append(ListItem::new(1, ()), true);
        assert_eq!(model.current_index(), Some(0));
        assert!(!model.item_at(0).is_selected());

        model.insert(0, ListItem::new(2, ()), true);
        assert_eq!(model.current_index(), Some(1));
        assert_eq!(model.ids(), vec![2, 1]);
    }

    #[test]
    fn test_browse_insert_selects_current() {
        let model = model_with(SelectionMode::Browse, 3);
        assert_eq!(model.selected_indices(), vec![0]);
    }

    #[test]
    fn test_remove_tracks_indices() {
        let mut model = model_with(SelectionMode::Extended, 5);
        model.set_current(Some(3), false);
        model.set_active(Some(1));
        model.set_anchor(Some(4));

        assert_eq!(model.remove(1, true), 1);
        assert_eq!(model.active(), None);
        assert_eq!(model.current_index(), Some(2));
        assert_eq!(model.anchor_index(), Some(3));
        assert_eq!(model.extent_index(), Some(3));
        assert_eq!(model.item_at(2).id(), 3);
    }

    #[test]
    fn test_browse_remove_selects_neighbor() {
        let mut model = model_with(SelectionMode::Browse, 3);
        model.set_current(Some(2), false);
        assert_eq!(model.selected_indices(), vec![2]);

        model.remove(2, false);
        assert_eq!(model.selected_indices(), vec![1]);
        assert_eq!(model.current_index(), Some(1));

        model.remove(0, false);
        assert_eq!(model.selected_indices(), vec![0]);
        assert_eq!(model.item_at(0).id(), 1);
    }

    #[test]
    fn test_replace_keeps_state_and_identity() {
        let mut model = model_with(SelectionMode::Extended, 3);
        model.select(1);
        model.set_current(Some(1), false);
        let old = model.replace(1, ListItem::new(10, 10), true);
        assert_eq!(old, 1);
        assert!(model.is_selected(1));
        assert_eq!(model.item_at(1).id(), 10);
        assert_eq!(model.current_index(), Some(1));
    }

    #[test]
    fn test_move_item_tracks_current() {
        let mut model = model_with(SelectionMode::Extended, 4);
        model.set_current(Some(0), false);
        let moves = Arc::new(Mutex::new(Vec::new()));
        let moves_clone = moves.clone();
        model.moved.connect(move |args| moves_clone.lock().push(*args));

        model.move_item(3, 0, true);
        assert_eq!(model.ids(), vec![1, 2, 3, 0]);
        assert_eq!(model.current_index(), Some(3));
        assert_eq!(*moves.lock(), vec![(0, 3)]);
    }

    #[test]
    fn test_clear_notifies_in_reverse() {
        let mut model = model_with(SelectionMode::Extended, 3);
        model.set_active(Some(2));
        let removed = Arc::new(Mutex::new(Vec::new()));
        let removed_clone = removed.clone();
        model.removed.connect(move |i| removed_clone.lock().push(*i));
        let cleared = Arc::new(Mutex::new(0));
        let cleared_clone = cleared.clone();
        model.cleared.connect(move |_| *cleared_clone.lock() += 1);

        model.clear(true);
        assert_eq!(*removed.lock(), vec![2, 1, 0]);
        assert_eq!(*cleared.lock(), 1);
        assert_eq!(model.tracked(), TrackedIndices::default());
        assert!(model.is_empty());
    }

    #[test]
    fn test_set_active_emits_on_change() {
        let mut model = model_with(SelectionMode::Extended, 3);
        let changes = Arc::new(Mutex::new(Vec::new()));
        let changes_clone = changes.clone();
        model.active_changed.connect(move |args| changes_clone.lock().push(*args));

        model.set_active(Some(1));
        model.set_active(Some(1));
        model.set_active(None);
        assert_eq!(*changes.lock(), vec![(Some(1), None), (None, Some(1))]);
    }

    #[test]
    fn test_focus_moves_with_current() {
        let mut model = model_with(SelectionMode::Extended, 3);
        model.focus_in();
        assert!(model.has_item_focus(0));
        model.set_current(Some(2), false);
        assert!(!model.has_item_focus(0));
        assert!(model.has_item_focus(2));
        model.focus_out();
        assert!(!model.has_item_focus(2));
    }

    #[test]
    fn test_flags() {
        let mut model = model_with(SelectionMode::Extended, 1);
        assert!(model.is_draggable(0));
        model.set_draggable(0, false);
        model.set_playable(0, false);
        model.set_shaded(0, true);
        assert!(!model.is_draggable(0));
        assert!(!model.is_playable(0));
        assert!(model.is_shaded(0));
    }

    #[test]
    #[should_panic(expected = "set_active: index 3 out of range (len 3)")]
    fn test_set_active_out_of_range() {
        let mut model = model_with(SelectionMode::Extended, 3);
        model.set_active(Some(3));
    }
}
