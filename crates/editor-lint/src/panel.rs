//! Diagnostics panel model.
//!
//! [`DiagnosticPanel`] is the headless half of a diagnostics list: it keeps the reconciled
//! items, tracks which row is selected, and turns keyboard navigation into lint transactions.
//! The render state `T` of each row is opaque to the panel.

use crate::anchors::AnchoredDiagnostic;
use crate::reconcile::{ItemIds, ListEdit, ListItem, reconcile};
use crate::reducer::Transaction;
use crate::state::{LintState, SelectedDiagnostic};

/// Panel navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelMove {
    /// Select the next row, wrapping to the first.
    Next,
    /// Select the previous row, wrapping to the last.
    Previous,
    /// Select the first row.
    First,
    /// Select the last row.
    Last,
    /// Select the row at the given index.
    To(usize),
}

/// Headless diagnostics list.
#[derive(Debug, Clone)]
pub struct DiagnosticPanel<T> {
    items: Vec<ListItem<T>>,
    ids: ItemIds,
    selected_index: Option<usize>,
}

impl<T> Default for DiagnosticPanel<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            ids: ItemIds::new(),
            selected_index: None,
        }
    }
}

impl<T> DiagnosticPanel<T> {
    /// Create an empty panel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows in document order.
    pub fn items(&self) -> &[ListItem<T>] {
        &self.items
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the panel has no rows.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index of the selected row.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    /// Bring the rows in line with `state` and return the edits a renderer must replay.
    pub fn sync<F>(&mut self, state: &LintState, make: F) -> Vec<ListEdit>
    where
        F: FnMut(&AnchoredDiagnostic) -> T,
    {
        let previous = std::mem::take(&mut self.items);
        let out = reconcile(previous, state.anchors(), state.selected(), &mut self.ids, make);
        self.items = out.items;
        self.selected_index = out.selected_index;
        if !out.edits.is_empty() {
            tracing::debug!(rows = self.items.len(), edits = out.edits.len(), "panel synced");
        }
        out.edits
    }

    /// Build the transaction that selects another row.
    ///
    /// Returns `None` when the panel is empty, the index is out of range, or the row's
    /// diagnostic is no longer anchored in `state`.
    pub fn move_selection(&self, state: &LintState, movement: PanelMove) -> Option<Transaction> {
        let len = self.items.len();
        if len == 0 {
            return None;
        }

        let index = match (movement, self.selected_index) {
            (PanelMove::Next, Some(i)) => (i + 1) % len,
            (PanelMove::Next, None) | (PanelMove::First, _) => 0,
            (PanelMove::Previous, Some(i)) => (i + len - 1) % len,
            (PanelMove::Previous, None) | (PanelMove::Last, _) => len - 1,
            (PanelMove::To(i), _) if i < len => i,
            (PanelMove::To(_), _) => return None,
        };

        let item = &self.items[index];
        let entry = state.anchors().find(Some(&item.diagnostic), 0)?;
        Some(Transaction::replace_state(
            state.with_selected(Some(SelectedDiagnostic::from(entry))),
        ))
    }
}
