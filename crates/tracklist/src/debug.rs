//! Textual dumps of list state for logs and assertion messages.

use std::fmt;

use crate::model::TrackModel;

/// Displays a model one item per line, with its flags and the tracked
/// indices that point at it.
///
/// ```text
/// 3 items, mode Extended
///     0  #10
///     1  #11  selected anchor
///     2  #12  selected focused current extent
/// ```
pub struct TrackListDebug<'a, T> {
    model: &'a TrackModel<T>,
}

impl<T> TrackModel<T> {
    pub fn debug(&self) -> TrackListDebug<'_, T> {
        TrackListDebug { model: self }
    }
}

impl<T> fmt::Display for TrackListDebug<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let model = self.model;
        write!(
            f,
            "{} items, mode {:?}",
            model.item_count(),
            model.selection_mode()
        )?;
        for (index, item) in model.items().enumerate() {
            write!(f, "\n{index:>5}  #{}", item.id())?;
            let flags = [
                (item.is_selected(), "selected"),
                (item.has_focus(), "focused"),
                (!item.is_draggable(), "pinned"),
                (!item.is_playable(), "unplayable"),
                (item.is_shaded(), "shaded"),
                (model.anchor_index() == Some(index), "anchor"),
                (model.current_index() == Some(index), "current"),
                (model.extent_index() == Some(index), "extent"),
                (model.active() == Some(index), "active"),
            ];
            let mut first = true;
            for (_, name) in flags.iter().filter(|(set, _)| *set) {
                f.write_str(if first { "  " } else { " " })?;
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl<T> fmt::Debug for TrackListDebug<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
