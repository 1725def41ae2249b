//! Drag-to-reorder: drop target computation and the drag session.
//!
//! A reorder drag goes through three phases:
//!
//! 1. **Pending**: a press on a selected, draggable row arms the session
//! 2. **Dragging**: motion past the threshold starts it; every motion
//!    recomputes the drop target and its indicator line
//! 3. **Drop or cancel**: drop applies the relocation; cancel discards the
//!    session without touching the items
//!
//! The relocation itself is [`TrackModel::apply_move`](crate::model::TrackModel::apply_move).

use tracklist_core::{Point, Rect};

use crate::model::ItemId;

/// Insertion boundary under `pointer_y`, in `0..=count`.
///
/// The pointer's row is found first; the upper half of a row drops before
/// it and the lower half after it. Returns `None` for an empty list.
pub fn compute_drop_target(
    pointer_y: f32,
    scroll_offset: f32,
    header_height: f32,
    row_height: f32,
    count: usize,
) -> Option<usize> {
    if count == 0 || row_height <= 0.0 {
        return None;
    }
    let row = ((pointer_y - scroll_offset - header_height) / row_height).floor();
    let row = (row.max(0.0) as usize).min(count);
    let row_top = scroll_offset + row as f32 * row_height + header_height;
    let row_mid = row_top + row_height / 2.0;
    if pointer_y <= row_mid {
        Some(row)
    } else {
        Some((row + 1).min(count))
    }
}

/// The insertion line drawn while dragging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropIndicator {
    /// Drop boundary the line marks.
    pub index: usize,
    /// Line rectangle in widget coordinates, 2px tall, centered on the
    /// boundary.
    pub rect: Rect,
}

impl DropIndicator {
    pub fn new(
        index: usize,
        scroll_offset: f32,
        header_height: f32,
        row_height: f32,
        width: f32,
    ) -> Self {
        let y = scroll_offset + index as f32 * row_height + header_height;
        Self {
            index,
            rect: Rect::new(0.0, y - 1.0, width, 2.0),
        }
    }
}

/// Phase of a [`DragSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Pending,
    Dragging,
}

/// Cross-event state of a reorder drag.
///
/// Nothing here mutates the list; the session only remembers where the drag
/// began, which items it carries, and where they would land.
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    state: DragState,
    origin: Point,
    threshold: f32,
    ids: Vec<ItemId>,
    indicator: Option<DropIndicator>,
}

impl DragSession {
    /// Default drag threshold in pixels.
    pub const DEFAULT_DRAG_THRESHOLD: f32 = 4.0;

    pub fn new() -> Self {
        Self::with_threshold(Self::DEFAULT_DRAG_THRESHOLD)
    }

    pub fn with_threshold(threshold: f32) -> Self {
        Self {
            threshold,
            ..Default::default()
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold;
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == DragState::Pending
    }

    pub fn is_dragging(&self) -> bool {
        self.state == DragState::Dragging
    }

    /// Ids of the items being dragged.
    pub fn ids(&self) -> &[ItemId] {
        &self.ids
    }

    pub fn indicator(&self) -> Option<DropIndicator> {
        self.indicator
    }

    pub fn target(&self) -> Option<usize> {
        self.indicator.map(|indicator| indicator.index)
    }

    /// Arms a drag at the press position.
    pub fn prepare(&mut self, origin: Point) {
        self.state = DragState::Pending;
        self.origin = origin;
        self.ids.clear();
        self.indicator = None;
    }

    /// Starts the drag once the pointer has moved past the threshold.
    ///
    /// `ids` is only called when the drag actually starts. Returns true on
    /// the transition to dragging.
    pub fn check_start(&mut self, position: Point, ids: impl FnOnce() -> Vec<ItemId>) -> bool {
        if self.state != DragState::Pending {
            return false;
        }
        if self.origin.distance_to(position) < self.threshold {
            return false;
        }
        self.ids = ids();
        self.state = DragState::Dragging;
        true
    }

    /// Records the drop indicator for the latest motion. Returns whether the
    /// target changed.
    pub fn update(&mut self, indicator: Option<DropIndicator>) -> bool {
        if !self.is_dragging() {
            return false;
        }
        let changed = self.target() != indicator.map(|i| i.index);
        self.indicator = indicator;
        changed
    }

    /// Ends the session, returning the drop target if a drag was active.
    pub fn finish(&mut self) -> Option<usize> {
        let target = if self.is_dragging() { self.target() } else { None };
        self.reset();
        target
    }

    /// Discards the session.
    pub fn cancel(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.state = DragState::Idle;
        self.ids.clear();
        self.indicator = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_target_halves() {
        // Rows 20px tall below a 24px header, no scroll.
        let target = |y: f32| compute_drop_target(y, 0.0, 24.0, 20.0, 5);
        assert_eq!(target(24.0), Some(0));
        assert_eq!(target(34.0), Some(0));
        assert_eq!(target(34.5), Some(1));
        assert_eq!(target(45.0), Some(1));
        assert_eq!(target(0.0), Some(0));
        assert_eq!(target(500.0), Some(5));
    }

    #[test]
    fn test_drop_target_with_scroll() {
        assert_eq!(compute_drop_target(30.0, -40.0, 24.0, 20.0, 10), Some(2));
        assert_eq!(compute_drop_target(40.0, -40.0, 24.0, 20.0, 10), Some(3));
    }

    #[test]
    fn test_drop_target_empty_list() {
        assert_eq!(compute_drop_target(30.0, 0.0, 24.0, 20.0, 0), None);
    }

    #[test]
    fn test_indicator_sits_on_boundary() {
        let indicator = DropIndicator::new(2, -10.0, 24.0, 20.0, 300.0);
        assert_eq!(indicator.rect, Rect::new(0.0, 53.0, 300.0, 2.0));
    }

    #[test]
    fn test_session_threshold() {
        let mut session = DragSession::new();
        assert!(!session.check_start(Point::new(50.0, 50.0), || vec![1]));

        session.prepare(Point::new(10.0, 10.0));
        assert!(session.is_pending());
        assert!(!session.check_start(Point::new(12.0, 11.0), || unreachable!()));
        assert!(session.check_start(Point::new(10.0, 14.0), || vec![3, 7]));
        assert!(session.is_dragging());
        assert_eq!(session.ids(), &[3, 7]);
    }

    #[test]
    fn test_session_update_and_finish() {
        let mut session = DragSession::new();
        session.prepare(Point::ZERO);
        assert!(!session.update(Some(DropIndicator::new(1, 0.0, 0.0, 20.0, 100.0))));

        session.check_start(Point::new(0.0, 10.0), || vec![1]);
        assert!(session.update(Some(DropIndicator::new(1, 0.0, 0.0, 20.0, 100.0))));
        assert!(!session.update(Some(DropIndicator::new(1, 0.0, 0.0, 20.0, 100.0))));
        assert!(session.update(Some(DropIndicator::new(3, 0.0, 0.0, 20.0, 100.0))));
        assert_eq!(session.finish(), Some(3));
        assert_eq!(session.state(), DragState::Idle);
        assert_eq!(session.finish(), None);
    }

    #[test]
    fn test_session_cancel() {
        let mut session = DragSession::new();
        session.prepare(Point::ZERO);
        session.check_start(Point::new(10.0, 0.0), || vec![1]);
        session.update(Some(DropIndicator::new(0, 0.0, 0.0, 20.0, 100.0)));
        session.cancel();
        assert!(session.indicator().is_none());
        assert!(session.ids().is_empty());
        assert_eq!(session.finish(), None);
    }
}
