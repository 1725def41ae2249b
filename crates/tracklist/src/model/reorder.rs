//! Batch relocation of items: drag drops and externally produced orders.

use std::collections::{HashMap, VecDeque};

use tracklist_core::PerfSpan;
use tracklist_core::logging::{span_names, targets};

use super::item::{ItemId, ItemState, ListItem};
use super::selection::SelectionMode;
use super::track_model::TrackModel;

impl<T> TrackModel<T> {
    /// Moves every selected item to `drop`, a boundary in `0..=item_count`.
    ///
    /// Items are scanned from the end. A selected item at `i` is moved to
    /// `drop - 1` when it lies before the drop point (which then shifts left
    /// by one) and to `drop` otherwise. After a move to a lower index the
    /// scan revisits `i`, which now holds the next item down. Moved items
    /// lose their selection quietly during the scan so none is visited twice.
    /// In Browse mode the single selection is restored once the scan is done.
    /// An item already sitting just before the drop point stays where it is.
    ///
    /// Returns whether anything moved. If so, `reordered` carries the new id
    /// order and tracked indices follow their items.
    ///
    /// # Panics
    ///
    /// Panics if `drop > item_count`.
    #[track_caller]
    pub fn apply_move(&mut self, drop: usize) -> bool {
        let len = self.store.len();
        assert!(drop <= len, "apply_move: drop index {drop} out of range (len {len})");
        let _perf = PerfSpan::new(span_names::DROP);

        let keys = self.tracked.capture(&self.store);
        let mut drop = drop;
        let mut moved = 0usize;
        let mut kept = Vec::new();
        let mut i = len;
        while i > 0 {
            let index = i - 1;
            if !self.store.at(index).is_selected() || index + 1 == drop {
                i -= 1;
                continue;
            }
            let target = if index < drop { drop - 1 } else { drop };
            self.store.move_item(target, index);
            let item = self.store.at_mut(target);
            item.state.remove(ItemState::SELECTED);
            if self.mode == SelectionMode::Browse {
                kept.push(item.key);
            }
            moved += 1;
            tracing::trace!(target: targets::DRAG, from = index, to = target, "relocated");
            if index < drop {
                drop -= 1;
                i -= 1;
            }
        }

        if moved == 0 {
            return false;
        }
        for key in kept {
            if let Some(index) = self.store.position_of_key(key) {
                self.store.at_mut(index).state.insert(ItemState::SELECTED);
            }
        }
        self.tracked.resolve(keys, &self.store);
        tracing::debug!(target: targets::DRAG, moved, "drop applied");
        self.reordered.emit(self.ids());
        true
    }

    /// Installs an order produced elsewhere, such as a shuffle.
    ///
    /// `ids` must be a permutation of the current ids; duplicates are matched
    /// in their current order. Tracked indices follow their items.
    ///
    /// # Panics
    ///
    /// Panics if `ids` is not a permutation of the list's ids.
    #[track_caller]
    pub fn install_order(&mut self, ids: &[ItemId]) {
        let len = self.store.len();
        assert_eq!(
            ids.len(),
            len,
            "install_order: expected {len} ids, got {}",
            ids.len()
        );
        let _perf = PerfSpan::new(span_names::INSTALL_ORDER);

        let mut positions: HashMap<ItemId, VecDeque<usize>> = HashMap::new();
        for (index, item) in self.store.iter().enumerate() {
            positions.entry(item.id).or_default().push_back(index);
        }
        let order: Vec<usize> = ids
            .iter()
            .map(|id| {
                positions
                    .get_mut(id)
                    .and_then(VecDeque::pop_front)
                    .unwrap_or_else(|| panic!("install_order: id {id} is not in the list"))
            })
            .collect();

        let keys = self.tracked.capture(&self.store);
        let mut slots: Vec<Option<ListItem<T>>> = self.store.clear().into_iter().map(Some).collect();
        let items = order
            .into_iter()
            .filter_map(|index| slots[index].take())
            .collect();
        self.store.replace_items(items);
        self.tracked.resolve(keys, &self.store);
        tracing::debug!(target: targets::STORE, items = len, "order installed");
    }
}
