//! The sort engine.
//!
//! Sorting is an in-place shell sort over the item store. Tracked indices
//! follow item identity across the pass, so the current and active items
//! stay the same logical items after reordering.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracklist_core::PerfSpan;
use tracklist_core::logging::{span_names, targets};

use super::column::{ColumnType, Comparator};
use super::track_model::TrackModel;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn reversed(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// The active sort of one list instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    column: Option<ColumnType>,
    order: SortOrder,
}

impl SortState {
    pub fn new(column: Option<ColumnType>, order: SortOrder) -> Self {
        Self { column, order }
    }

    /// `None` when the list is unsorted.
    pub fn get(&self) -> Option<(ColumnType, SortOrder)> {
        self.column.map(|column| (column, self.order))
    }

    pub fn column(&self) -> Option<ColumnType> {
        self.column
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn set(&mut self, column: ColumnType, order: SortOrder) {
        self.column = Some(column);
        self.order = order;
    }

    pub fn clear(&mut self) {
        self.column = None;
        self.order = SortOrder::Ascending;
    }

    /// Header click: the active column flips direction, any other column
    /// becomes active in ascending order.
    pub fn clicked(&mut self, column: ColumnType) -> (ColumnType, SortOrder) {
        if self.column == Some(column) {
            self.order = self.order.reversed();
        } else {
            self.column = Some(column);
            self.order = SortOrder::Ascending;
        }
        (column, self.order)
    }
}

/// Sorts `items` in place with a shell sort.
///
/// The gap sequence is 1, 4, 13, 40, ... up to `n / 9`, walked back down.
/// Not stable, but deterministic for a deterministic comparator.
pub fn shell_sort<E>(items: &mut [E], mut compare: impl FnMut(&E, &E) -> Ordering) {
    let n = items.len();
    if n < 2 {
        return;
    }
    let mut h = 1;
    while h <= n / 9 {
        h = 3 * h + 1;
    }
    while h > 0 {
        for i in h..n {
            let mut j = i;
            while j >= h && compare(&items[j - h], &items[j]) == Ordering::Greater {
                items.swap(j - h, j);
                j -= h;
            }
        }
        h /= 3;
    }
}

impl<T> TrackModel<T> {
    /// Sorts the items with `comparator`; `None` leaves the order alone.
    ///
    /// Anchor, current, extent, and active are re-resolved by identity.
    pub fn sort_by(&mut self, comparator: Option<&Comparator<T>>) {
        let Some(comparator) = comparator else {
            return;
        };
        let _perf = PerfSpan::new(span_names::SORT);
        let keys = self.tracked.capture(&self.store);
        shell_sort(self.store.as_mut_slice(), |a, b| comparator(&a.data, &b.data));
        self.tracked.resolve(keys, &self.store);
        tracing::debug!(
            target: targets::SORT,
            items = self.store.len(),
            current = ?self.tracked.current,
            "sorted"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::item::ListItem;
    use crate::model::selection::SelectionMode;

    #[test]
    fn test_shell_sort_matches_std() {
        // Lengths straddling the gap thresholds (n/9 >= 1, 4, 13).
        for n in [0usize, 1, 2, 9, 10, 37, 40, 130, 500] {
            let mut values: Vec<u64> = (0..n as u64).map(|i| (i * 7919 + 13) % 101).collect();
            let mut expected = values.clone();
            expected.sort();
            shell_sort(&mut values, |a, b| a.cmp(b));
            assert_eq!(values, expected, "n = {n}");
        }
    }

    #[test]
    fn test_sort_state_clicks() {
        let mut state = SortState::default();
        assert_eq!(state.get(), None);
        assert_eq!(state.clicked(ColumnType::Title), (ColumnType::Title, SortOrder::Ascending));
        assert_eq!(state.clicked(ColumnType::Title), (ColumnType::Title, SortOrder::Descending));
        assert_eq!(state.clicked(ColumnType::Artist), (ColumnType::Artist, SortOrder::Ascending));
        state.clear();
        assert_eq!(state.get(), None);
    }

    #[test]
    fn test_sort_preserves_current_identity() {
        let mut model = TrackModel::new(SelectionMode::Extended);
        for (id, name) in ["A", "B", "C"].into_iter().enumerate() {
            model.append(ListItem::new(id as i64, name), false);
        }
        model.set_current(Some(1), false);
        model.set_active(Some(0));

        let descending: Comparator<&str> = Arc::new(|a: &&str, b: &&str| b.cmp(a));
        model.sort_by(Some(&descending));

        let names: Vec<&str> = model.items().map(|item| *item.data()).collect();
        assert_eq!(names, vec!["C", "B", "A"]);
        assert_eq!(model.current_index(), Some(1));
        assert_eq!(model.active(), Some(2));
    }

    #[test]
    fn test_sort_without_comparator_is_noop() {
        let mut model = TrackModel::new(SelectionMode::Extended);
        for id in [3, 1, 2] {
            model.append(ListItem::new(id, id), false);
        }
        model.sort_by(None);
        assert_eq!(model.ids(), vec![3, 1, 2]);
    }
}
