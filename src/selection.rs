use log::debug;
use serde::Deserialize;

use crate::data::filter::FilteredView;
use crate::error::{Result, ViewerError};

// ---------------------------------------------------------------------------
// Selection state machine
// ---------------------------------------------------------------------------

/// Which student of the current view is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// The view has no rows.
    Empty,
    /// Offset into the current view.
    Active(usize),
}

/// What happens to the selection when a new view replaces the old one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Always jump to the first match.
    ResetToFirst,
    /// Stay on the same dataset row if it is still in the view, otherwise
    /// jump to the first match.
    #[default]
    KeepSelected,
}

/// Tracks the current filtered view and the selected offset within it.
#[derive(Debug, Clone)]
pub struct SelectionController {
    view: FilteredView,
    selection: Selection,
}

impl Default for SelectionController {
    fn default() -> Self {
        Self {
            view: FilteredView::default(),
            selection: Selection::Empty,
        }
    }
}

impl SelectionController {
    /// Replace the view and re-derive the selection under `policy`.
    pub fn on_new_view(&mut self, view: FilteredView, policy: SelectionPolicy) {
        let previous_row = self.current_row();
        self.selection = if view.is_empty() {
            Selection::Empty
        } else {
            let kept = match policy {
                SelectionPolicy::KeepSelected => previous_row.and_then(|row| view.position_of(row)),
                SelectionPolicy::ResetToFirst => None,
            };
            Selection::Active(kept.unwrap_or(0))
        };
        self.view = view;
        debug!(
            "view '{}' has {} rows, selection {:?}",
            self.view.term,
            self.view.len(),
            self.selection
        );
    }

    /// Step back one student. No-op at the first row or when empty.
    pub fn prev(&mut self) {
        if let Selection::Active(index) = self.selection {
            self.selection = Selection::Active(index.saturating_sub(1));
        }
    }

    /// Step forward one student. No-op at the last row or when empty.
    pub fn next(&mut self) {
        if let Selection::Active(index) = self.selection {
            let last = self.view.len().saturating_sub(1);
            self.selection = Selection::Active((index + 1).min(last));
        }
    }

    /// Jump to offset `index` of the current view.
    pub fn select(&mut self, index: usize) -> Result<()> {
        let len = self.view.len();
        if index >= len {
            return Err(ViewerError::IndexOutOfRange { index, len });
        }
        self.selection = Selection::Active(index);
        Ok(())
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn view(&self) -> &FilteredView {
        &self.view
    }

    /// Selected offset within the view.
    pub fn index(&self) -> Option<usize> {
        match self.selection {
            Selection::Active(index) => Some(index),
            Selection::Empty => None,
        }
    }

    /// Dataset row index of the selected student.
    pub fn current_row(&self) -> Option<usize> {
        self.index().and_then(|i| self.view.indices.get(i).copied())
    }

    pub fn can_prev(&self) -> bool {
        matches!(self.selection, Selection::Active(i) if i > 0)
    }

    pub fn can_next(&self) -> bool {
        matches!(self.selection, Selection::Active(i) if i + 1 < self.view.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(indices: &[usize]) -> FilteredView {
        FilteredView {
            term: String::new(),
            indices: indices.to_vec(),
        }
    }

    fn active(indices: &[usize]) -> SelectionController {
        let mut c = SelectionController::default();
        c.on_new_view(view(indices), SelectionPolicy::ResetToFirst);
        c
    }

    #[test]
    fn starts_empty() {
        let c = SelectionController::default();
        assert_eq!(c.selection(), Selection::Empty);
        assert_eq!(c.current_row(), None);
        assert!(!c.can_prev() && !c.can_next());
    }

    #[test]
    fn new_view_resets_to_first() {
        let c = active(&[4, 7, 9]);
        assert_eq!(c.selection(), Selection::Active(0));
        assert_eq!(c.current_row(), Some(4));
    }

    #[test]
    fn empty_view_is_empty_state() {
        let mut c = active(&[1, 2]);
        c.on_new_view(view(&[]), SelectionPolicy::KeepSelected);
        assert_eq!(c.selection(), Selection::Empty);
    }

    #[test]
    fn prev_saturates_at_zero() {
        let mut c = active(&[0, 1, 2]);
        c.prev();
        assert_eq!(c.index(), Some(0));
        assert!(!c.can_prev());
    }

    #[test]
    fn next_saturates_at_last() {
        let mut c = active(&[0, 1, 2]);
        c.next();
        c.next();
        assert_eq!(c.index(), Some(2));
        assert!(!c.can_next());
        c.next();
        assert_eq!(c.index(), Some(2));
        c.prev();
        assert_eq!(c.index(), Some(1));
    }

    #[test]
    fn navigation_on_empty_is_noop() {
        let mut c = SelectionController::default();
        c.next();
        c.prev();
        assert_eq!(c.selection(), Selection::Empty);
    }

    #[test]
    fn select_in_range_and_out_of_range() {
        let mut c = active(&[3, 5, 8]);
        assert_eq!(c.select(2), Ok(()));
        assert_eq!(c.index(), Some(2));
        assert_eq!(c.current_row(), Some(8));
        assert_eq!(
            c.select(3),
            Err(ViewerError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(c.index(), Some(2));
    }

    #[test]
    fn keep_selected_follows_the_same_row() {
        let mut c = active(&[0, 1, 2, 3]);
        c.select(2).unwrap();
        c.on_new_view(view(&[2, 3]), SelectionPolicy::KeepSelected);
        assert_eq!(c.index(), Some(0));
        assert_eq!(c.current_row(), Some(2));

        c.select(1).unwrap();
        c.on_new_view(view(&[0, 1, 2, 3]), SelectionPolicy::KeepSelected);
        assert_eq!(c.current_row(), Some(3));

        c.on_new_view(view(&[0, 1]), SelectionPolicy::KeepSelected);
        assert_eq!(c.index(), Some(0));
    }

    #[test]
    fn reset_policy_ignores_previous_row() {
        let mut c = active(&[0, 1, 2]);
        c.select(2).unwrap();
        c.on_new_view(view(&[1, 2]), SelectionPolicy::ResetToFirst);
        assert_eq!(c.current_row(), Some(1));
    }
}
