//! Owned item storage and the tracked-index helper.
//!
//! [`ItemStore`] is a plain contiguous sequence. Every structural mutation is
//! paired with a [`TrackedIndices`] adjustment so the anchor, current,
//! extent, and active indices keep pointing at the same logical item.

use super::item::{ItemId, ListItem};

/// Contiguous, index-addressed item storage.
///
/// Each entry is stamped with a store-unique key on insertion. The key is
/// how sort and reorder passes recover identities after shuffling entries.
pub struct ItemStore<T> {
    items: Vec<ListItem<T>>,
    next_key: u64,
}

impl<T> Default for ItemStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ItemStore<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_key: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Inserts an entry before `index` (or at the end when `index == len`).
    #[track_caller]
    pub fn insert(&mut self, index: usize, mut item: ListItem<T>) {
        assert!(
            index <= self.items.len(),
            "insert: index {index} out of range (len {})",
            self.items.len()
        );
        item.key = self.next_key;
        self.next_key += 1;
        self.items.insert(index, item);
    }

    #[track_caller]
    pub fn remove(&mut self, index: usize) -> ListItem<T> {
        self.check(index, "remove");
        self.items.remove(index)
    }

    /// Relocates the entry at `old` so it ends up at `new`.
    #[track_caller]
    pub fn move_item(&mut self, new: usize, old: usize) {
        self.check(old, "move_item");
        self.check(new, "move_item");
        if new != old {
            let item = self.items.remove(old);
            self.items.insert(new, item);
        }
    }

    /// Drops every entry, returning them in index order.
    pub fn clear(&mut self) -> Vec<ListItem<T>> {
        std::mem::take(&mut self.items)
    }

    pub fn get(&self, index: usize) -> Option<&ListItem<T>> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ListItem<T>> {
        self.items.get_mut(index)
    }

    #[track_caller]
    pub(crate) fn at(&self, index: usize) -> &ListItem<T> {
        self.check(index, "item_at");
        &self.items[index]
    }

    #[track_caller]
    pub(crate) fn at_mut(&mut self, index: usize) -> &mut ListItem<T> {
        self.check(index, "item_at");
        &mut self.items[index]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ListItem<T>> {
        self.items.iter()
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [ListItem<T>] {
        &mut self.items
    }

    pub(crate) fn key_at(&self, index: usize) -> u64 {
        self.items[index].key
    }

    /// Finds the current position of the entry stamped with `key`.
    pub(crate) fn position_of_key(&self, key: u64) -> Option<usize> {
        self.items.iter().position(|item| item.key == key)
    }

    /// Index of the first entry with `id`.
    pub fn find_by_id(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub(crate) fn replace_items(&mut self, items: Vec<ListItem<T>>) {
        self.items = items;
    }

    #[track_caller]
    fn check(&self, index: usize, operation: &str) {
        assert!(
            index < self.items.len(),
            "{operation}: index {index} out of range (len {})",
            self.items.len()
        );
    }
}

/// The four indices the list tracks across structural mutations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackedIndices {
    pub anchor: Option<usize>,
    pub current: Option<usize>,
    pub extent: Option<usize>,
    pub active: Option<usize>,
}

/// Identities of the tracked items, captured before a reordering pass.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TrackedKeys {
    anchor: Option<u64>,
    current: Option<u64>,
    extent: Option<u64>,
    active: Option<u64>,
}

impl TrackedIndices {
    fn for_each(&mut self, mut f: impl FnMut(usize) -> Option<usize>) {
        for slot in [
            &mut self.anchor,
            &mut self.current,
            &mut self.extent,
            &mut self.active,
        ] {
            *slot = slot.and_then(&mut f);
        }
    }

    /// An item was inserted at `index`.
    pub fn on_insert(&mut self, index: usize) {
        self.for_each(|i| Some(if i >= index { i + 1 } else { i }));
    }

    /// The item at `index` was removed. Indices pointing at it become `None`.
    pub fn on_remove(&mut self, index: usize) {
        self.for_each(|i| match i.cmp(&index) {
            std::cmp::Ordering::Less => Some(i),
            std::cmp::Ordering::Equal => None,
            std::cmp::Ordering::Greater => Some(i - 1),
        });
    }

    /// The item at `old` now lives at `new`.
    pub fn on_move(&mut self, old: usize, new: usize) {
        self.for_each(|i| {
            Some(if i == old {
                new
            } else if old < new && i > old && i <= new {
                i - 1
            } else if old > new && i >= new && i < old {
                i + 1
            } else {
                i
            })
        });
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn capture<T>(&self, store: &ItemStore<T>) -> TrackedKeys {
        let key = |slot: Option<usize>| slot.map(|i| store.key_at(i));
        TrackedKeys {
            anchor: key(self.anchor),
            current: key(self.current),
            extent: key(self.extent),
            active: key(self.active),
        }
    }

    /// Re-resolves every index from previously captured identities.
    pub(crate) fn resolve<T>(&mut self, keys: TrackedKeys, store: &ItemStore<T>) {
        let find = |key: Option<u64>| key.and_then(|k| store.position_of_key(k));
        self.anchor = find(keys.anchor);
        self.current = find(keys.current);
        self.extent = find(keys.extent);
        self.active = find(keys.active);
    }
}
