//! The selection engine.
//!
//! Selection lives in each item's SELECTED bit; the engine adds the mode
//! rules and the anchor/extent range logic on top. Every operation notifies
//! `selected`/`deselected` once per bit that actually flipped, so a repeated
//! call never produces duplicate notifications.
//!
//! # Modes
//!
//! | Mode     | Rule                                                        |
//! |----------|-------------------------------------------------------------|
//! | Single   | at most one item selected                                   |
//! | Browse   | exactly one item selected while the list is non-empty       |
//! | Multiple | items toggle independently                                  |
//! | Extended | plain, ctrl-toggle, and shift-extend gestures               |

use serde::{Deserialize, Serialize};
use tracklist_core::logging::targets;

use super::item::{ItemId, ItemState};
use super::track_model::TrackModel;

/// Selection policy of a list, fixed per instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    Single,
    Browse,
    Multiple,
    #[default]
    Extended,
}

impl SelectionMode {
    /// Whether at most one item may be selected.
    pub fn is_exclusive(self) -> bool {
        matches!(self, SelectionMode::Single | SelectionMode::Browse)
    }
}

/// Keyboard modifiers held during a pointer or key gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        control: false,
    };
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
    };
    pub const CONTROL: Self = Self {
        shift: false,
        control: true,
    };
}

impl<T> TrackModel<T> {
    // =========================================================================
    // Raw bit flips
    // =========================================================================

    fn set_selected_bit(&mut self, index: usize, selected: bool) -> bool {
        let item = self.store.at_mut(index);
        if item.is_selected() == selected {
            return false;
        }
        item.state.set(ItemState::SELECTED, selected);
        if selected {
            self.selected.emit(index);
        } else {
            self.deselected.emit(index);
        }
        true
    }

    fn deselect_all_except(&mut self, keep: Option<usize>) -> bool {
        let mut changed = false;
        for index in 0..self.store.len() {
            if Some(index) != keep {
                changed |= self.set_selected_bit(index, false);
            }
        }
        changed
    }

    // =========================================================================
    // Single-item operations
    // =========================================================================

    #[track_caller]
    pub fn is_selected(&self, index: usize) -> bool {
        self.store.at(index).is_selected()
    }

    /// Selects one item. Exclusive modes deselect the previous selection
    /// first. Returns whether anything changed.
    #[track_caller]
    pub fn select(&mut self, index: usize) -> bool {
        self.check_index(index, "select");
        if self.store.at(index).is_selected() {
            return false;
        }
        if self.mode.is_exclusive() {
            self.deselect_all_except(Some(index));
        }
        self.set_selected_bit(index, true)
    }

    /// Deselects one item. Browse mode never deselects through this call.
    #[track_caller]
    pub fn deselect(&mut self, index: usize) -> bool {
        self.check_index(index, "deselect");
        if self.mode == SelectionMode::Browse {
            return false;
        }
        self.set_selected_bit(index, false)
    }

    /// Flips one item. In Browse mode this only ever selects.
    #[track_caller]
    pub fn toggle(&mut self, index: usize) -> bool {
        self.check_index(index, "toggle");
        if !self.store.at(index).is_selected() {
            self.select(index)
        } else if self.mode == SelectionMode::Browse {
            false
        } else {
            self.set_selected_bit(index, false)
        }
    }

    // =========================================================================
    // Range operations
    // =========================================================================

    /// Extends the selection from the anchor to `to`.
    ///
    /// Items newly covered by `[anchor, to]` are selected; items that were
    /// covered by `[anchor, extent]` but fall outside the new span are
    /// deselected. The anchor item itself is never touched. Afterwards the
    /// extent is `to`, so a repeated call changes nothing.
    ///
    /// Exclusive modes have no ranges: `to` is selected and becomes the
    /// extent.
    ///
    /// # Panics
    ///
    /// Panics if `to` is out of range or no anchor has been set.
    #[track_caller]
    pub fn extend_selection(&mut self, to: usize) -> bool {
        self.check_index(to, "extend_selection");
        let (Some(anchor), Some(extent)) = (self.tracked.anchor, self.tracked.extent) else {
            panic!("extend_selection: no anchor set");
        };

        if self.mode.is_exclusive() {
            let changed = self.select(to);
            self.tracked.extent = Some(to);
            return changed;
        }

        // Sort {to, anchor, extent} into i1 <= i2 <= i3.
        let (mut i1, mut i2) = if anchor < to { (anchor, to) } else { (to, anchor) };
        let i3;
        if extent < i1 {
            i3 = i2;
            i2 = i1;
            i1 = extent;
        } else if extent < i2 {
            i3 = i2;
            i2 = extent;
        } else {
            i3 = extent;
        }

        let mut changed = false;
        for i in i1..i2 {
            if i1 == to {
                changed |= self.set_selected_bit(i, true);
            } else if i1 == extent {
                changed |= self.set_selected_bit(i, false);
            }
        }
        for i in (i2 + 1)..=i3 {
            if i3 == to {
                changed |= self.set_selected_bit(i, true);
            } else if i3 == extent {
                changed |= self.set_selected_bit(i, false);
            }
        }

        tracing::trace!(target: targets::SELECTION, anchor, extent, to, changed, "extend selection");
        self.tracked.extent = Some(to);
        changed
    }

    /// Deselects every item.
    ///
    /// In Browse mode the selected item survives, so the list keeps exactly
    /// one selection.
    pub fn kill_selection(&mut self) -> bool {
        let keep = if self.mode == SelectionMode::Browse {
            self.tracked
                .current
                .filter(|&current| self.store.at(current).is_selected())
                .or_else(|| self.store.iter().position(|item| item.is_selected()))
        } else {
            None
        };
        self.deselect_all_except(keep)
    }

    /// Selects every item. Ignored by exclusive modes.
    pub fn select_all(&mut self) -> bool {
        if self.mode.is_exclusive() {
            return false;
        }
        let mut changed = false;
        for index in 0..self.store.len() {
            changed |= self.set_selected_bit(index, true);
        }
        changed
    }

    /// Same as [`kill_selection`](Self::kill_selection).
    pub fn deselect_all(&mut self) -> bool {
        self.kill_selection()
    }

    /// Flips every item. Ignored by exclusive modes.
    pub fn select_inverse(&mut self) -> bool {
        if self.mode.is_exclusive() {
            return false;
        }
        for index in 0..self.store.len() {
            let selected = self.store.at(index).is_selected();
            self.set_selected_bit(index, !selected);
        }
        !self.store.is_empty()
    }

    /// Selects each row in `rows`.
    pub fn select_rows(&mut self, rows: std::ops::RangeInclusive<usize>) -> bool {
        let mut changed = false;
        for index in rows {
            changed |= self.select(index);
        }
        changed
    }

    // =========================================================================
    // Anchor and current
    // =========================================================================

    /// Sets the range anchor. The extent collapses onto it.
    #[track_caller]
    pub fn set_anchor(&mut self, index: Option<usize>) {
        if let Some(index) = index {
            self.check_index(index, "set_anchor");
        }
        self.tracked.anchor = index;
        self.tracked.extent = index;
    }

    /// Moves the current item, carrying the FOCUSED bit when the list has
    /// focus. In Browse mode the new current item is selected.
    #[track_caller]
    pub fn set_current(&mut self, index: Option<usize>, notify: bool) {
        if let Some(index) = index {
            self.check_index(index, "set_current");
        }
        let old = self.tracked.current;
        if old != index {
            if self.has_focus {
                if let Some(old) = old {
                    self.store.at_mut(old).state.remove(ItemState::FOCUSED);
                }
                if let Some(new) = index {
                    self.store.at_mut(new).state.insert(ItemState::FOCUSED);
                }
            }
            self.tracked.current = index;
            if notify {
                self.current_changed.emit((index, old));
            }
        }
        if self.mode == SelectionMode::Browse
            && let Some(index) = index
        {
            self.select(index);
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn selected_indices(&self) -> Vec<usize> {
        self.store
            .iter()
            .enumerate()
            .filter(|(_, item)| item.is_selected())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn selected_ids(&self) -> Vec<ItemId> {
        self.store
            .iter()
            .filter(|item| item.is_selected())
            .map(|item| item.id)
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.store.iter().filter(|item| item.is_selected()).count()
    }

    // =========================================================================
    // Extended-mode gestures
    // =========================================================================

    /// Plain click: the item becomes the only selection and the anchor.
    #[track_caller]
    pub fn plain_select(&mut self, index: usize) -> bool {
        self.check_index(index, "plain_select");
        let mut changed = self.deselect_all_except(Some(index));
        changed |= self.select(index);
        self.set_anchor(Some(index));
        changed
    }

    /// Ctrl-click: flips the item and makes it the anchor.
    #[track_caller]
    pub fn ctrl_toggle(&mut self, index: usize) -> bool {
        let changed = self.toggle(index);
        self.set_anchor(Some(index));
        changed
    }

    /// Shift-click: extends from the anchor, or selects and anchors the item
    /// when there is no anchor yet.
    #[track_caller]
    pub fn shift_extend(&mut self, index: usize) -> bool {
        match self.tracked.anchor {
            Some(anchor) => {
                // The extent item may have been removed since.
                self.tracked.extent.get_or_insert(anchor);
                let mut changed = self.select(anchor);
                changed |= self.extend_selection(index);
                changed
            }
            None => {
                let changed = self.select(index);
                self.set_anchor(Some(index));
                changed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::model::item::ListItem;

    fn model(mode: SelectionMode, n: i64) -> TrackModel<()> {
        let mut model = TrackModel::new(mode);
        for id in 0..n {
            model.append(ListItem::new(id, ()), false);
        }
        model
    }

    type Log = Arc<Mutex<Vec<(bool, usize)>>>;

    fn record(model: &TrackModel<()>) -> Log {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let sel = log.clone();
        model.selected.connect(move |i| sel.lock().push((true, *i)));
        let desel = log.clone();
        model.deselected.connect(move |i| desel.lock().push((false, *i)));
        log
    }

    #[test]
    fn test_single_mode_keeps_one() {
        let mut model = model(SelectionMode::Single, 4);
        let log = record(&model);
        assert!(model.select(1));
        assert!(model.select(3));
        assert_eq!(model.selected_indices(), vec![3]);
        assert_eq!(*log.lock(), vec![(true, 1), (false, 1), (true, 3)]);

        assert!(model.toggle(3));
        assert_eq!(model.selected_count(), 0);
    }

    #[test]
    fn test_browse_mode_never_empties() {
        let mut model = model(SelectionMode::Browse, 3);
        assert_eq!(model.selected_indices(), vec![0]);
        assert!(!model.deselect(0));
        assert!(!model.toggle(0));
        assert!(model.toggle(2));
        assert_eq!(model.selected_indices(), vec![2]);
        model.set_current(Some(2), false);
        assert!(!model.kill_selection());
        assert_eq!(model.selected_indices(), vec![2]);
        assert!(!model.select_all());
    }

    #[test]
    fn test_multiple_mode_toggles_independently() {
        let mut model = model(SelectionMode::Multiple, 4);
        model.toggle(0);
        model.toggle(2);
        model.toggle(0);
        assert_eq!(model.selected_indices(), vec![2]);
        assert!(model.select_inverse());
        assert_eq!(model.selected_indices(), vec![0, 1, 3]);
    }

    #[test]
    fn test_select_is_idempotent() {
        let mut model = model(SelectionMode::Extended, 3);
        let log = record(&model);
        assert!(model.select(1));
        assert!(!model.select(1));
        assert!(model.deselect(1));
        assert!(!model.deselect(1));
        assert_eq!(log.lock().len(), 2);
    }

    #[test]
    fn test_extend_symmetry() {
        let mut model = model(SelectionMode::Extended, 12);
        model.plain_select(5);
        assert!(model.extend_selection(10));
        assert_eq!(model.selected_indices(), vec![5, 6, 7, 8, 9, 10]);

        let log = record(&model);
        assert!(model.extend_selection(7));
        assert_eq!(*log.lock(), vec![(false, 8), (false, 9), (false, 10)]);
        assert_eq!(model.selected_indices(), vec![5, 6, 7]);
    }

    #[test]
    fn test_extend_across_anchor() {
        let mut model = model(SelectionMode::Extended, 10);
        model.plain_select(5);
        model.extend_selection(8);
        model.extend_selection(2);
        assert_eq!(model.selected_indices(), vec![2, 3, 4, 5]);
        assert_eq!(model.extent_index(), Some(2));
    }

    #[test]
    fn test_extend_is_idempotent() {
        let mut model = model(SelectionMode::Extended, 10);
        model.plain_select(3);
        assert!(model.extend_selection(6));
        let log = record(&model);
        assert!(!model.extend_selection(6));
        assert!(log.lock().is_empty());
    }

    #[test]
    #[should_panic(expected = "extend_selection: no anchor set")]
    fn test_extend_without_anchor_panics() {
        let mut model = model(SelectionMode::Extended, 3);
        model.extend_selection(2);
    }

    #[test]
    fn test_ctrl_toggle_moves_anchor() {
        let mut model = model(SelectionMode::Extended, 10);
        model.plain_select(2);
        model.ctrl_toggle(6);
        assert_eq!(model.anchor_index(), Some(6));
        model.shift_extend(8);
        assert_eq!(model.selected_indices(), vec![2, 6, 7, 8]);
    }

    #[test]
    fn test_shift_extend_without_anchor_anchors() {
        let mut model = model(SelectionMode::Extended, 5);
        model.shift_extend(3);
        assert_eq!(model.selected_indices(), vec![3]);
        assert_eq!(model.anchor_index(), Some(3));
    }

    #[test]
    fn test_selected_ids() {
        let mut model = model(SelectionMode::Extended, 5);
        model.select(4);
        model.select(1);
        assert_eq!(model.selected_ids(), vec![1, 4]);
    }

    #[test]
    fn test_current_changed_notifies() {
        let mut model = model(SelectionMode::Extended, 3);
        let changes = Arc::new(Mutex::new(Vec::new()));
        let changes_clone = changes.clone();
        model.current_changed.connect(move |args| changes_clone.lock().push(*args));
        model.set_current(Some(2), true);
        model.set_current(Some(2), true);
        model.set_current(Some(1), false);
        assert_eq!(*changes.lock(), vec![(Some(2), Some(0))]);
    }
}
