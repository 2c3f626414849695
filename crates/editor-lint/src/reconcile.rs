//! Diagnostic list reconciliation.
//!
//! A diagnostics list view shows one item per anchored diagnostic, in document order. When the
//! diagnostic set changes, [`reconcile`] brings the list up to date in a single forward pass:
//! items whose diagnostic is still present are reused (keeping whatever render state they
//! carry), skipped items are removed, and new diagnostics get new items. The result is the new
//! list plus an explicit edit script that a renderer can replay against its own widgets.
//!
//! This is deliberately not an LCS diff. Edits are assumed to be local, so a forward search
//! from the current position finds most items immediately.

use crate::anchors::{Anchor, AnchoredDiagnostic, RangeAnchorSet};
use crate::diagnostics::DiagnosticRef;
use crate::state::SelectedDiagnostic;
use std::collections::VecDeque;

/// Stable identifier of a list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(u64);

/// Per-list monotonic [`ItemId`] generator.
#[derive(Debug, Clone, Default)]
pub struct ItemIds {
    next: u64,
}

impl ItemIds {
    /// Create a generator starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id.
    pub fn next_id(&mut self) -> ItemId {
        let id = ItemId(self.next);
        self.next += 1;
        id
    }
}

/// One row of a diagnostics list.
#[derive(Debug, Clone)]
pub struct ListItem<T> {
    /// Stable id, kept for as long as the diagnostic stays in the list.
    pub id: ItemId,
    /// The diagnostic shown by this row.
    pub diagnostic: DiagnosticRef,
    /// Position of the diagnostic as of the last reconciliation.
    pub anchor: Anchor,
    /// Render state owned by the view layer.
    pub rendered: T,
}

/// One step of a list edit script. Steps apply in order; indices refer to the list as left by
/// the previous step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEdit {
    /// Remove `count` items starting at `at`.
    Remove {
        /// First removed index.
        at: usize,
        /// Number of removed items.
        count: usize,
    },
    /// Insert the new item `id` at `at`.
    Insert {
        /// Insertion index.
        at: usize,
        /// Id of the inserted item.
        id: ItemId,
    },
}

/// Output of [`reconcile`].
#[derive(Debug, Clone)]
pub struct Reconciliation<T> {
    /// The updated list, in document order.
    pub items: Vec<ListItem<T>>,
    /// Steps transforming the previous list into `items`.
    pub edits: Vec<ListEdit>,
    /// Index of the selected diagnostic in `items`.
    pub selected_index: Option<usize>,
}

impl<T> Reconciliation<T> {
    /// Returns `true` if any item was added or removed.
    pub fn changed(&self) -> bool {
        !self.edits.is_empty()
    }
}

/// Bring `previous` in line with the diagnostics in `anchors`.
///
/// `make` renders a new item; it is only called for diagnostics that have no item yet.
/// Diagnostic identities must be unique within `anchors`.
pub fn reconcile<T, F>(
    previous: Vec<ListItem<T>>,
    anchors: &RangeAnchorSet,
    selected: Option<&SelectedDiagnostic>,
    ids: &mut ItemIds,
    mut make: F,
) -> Reconciliation<T>
where
    F: FnMut(&AnchoredDiagnostic) -> T,
{
    let mut tail: VecDeque<ListItem<T>> = previous.into();
    let mut items = Vec::with_capacity(anchors.len());
    let mut edits = Vec::new();
    let mut selected_index = None;

    for entry in anchors.iter() {
        let cursor = items.len();

        let found = tail
            .iter()
            .position(|item| item.diagnostic.same(&entry.diagnostic));
        let reused = match found {
            Some(skip) => {
                if skip > 0 {
                    tail.drain(..skip);
                    edits.push(ListEdit::Remove {
                        at: cursor,
                        count: skip,
                    });
                }
                tail.pop_front()
            }
            None => None,
        };

        let item = match reused {
            Some(mut item) => {
                item.anchor = entry.anchor;
                item
            }
            None => {
                let id = ids.next_id();
                edits.push(ListEdit::Insert { at: cursor, id });
                ListItem {
                    id,
                    diagnostic: entry.diagnostic.clone(),
                    anchor: entry.anchor,
                    rendered: make(entry),
                }
            }
        };

        if selected.is_some_and(|s| s.diagnostic.same(&item.diagnostic)) {
            selected_index = Some(cursor);
        }
        items.push(item);
    }

    if !tail.is_empty() {
        edits.push(ListEdit::Remove {
            at: items.len(),
            count: tail.len(),
        });
    }

    Reconciliation {
        items,
        edits,
        selected_index,
    }
}

/// Replay `edits` against a list of item ids, as a renderer would against its widgets.
pub fn apply_edits(list: &mut Vec<ItemId>, edits: &[ListEdit]) {
    for edit in edits {
        match *edit {
            ListEdit::Remove { at, count } => {
                let end = (at + count).min(list.len());
                list.drain(at.min(end)..end);
            }
            ListEdit::Insert { at, id } => list.insert(at.min(list.len()), id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{Diagnostic, DiagnosticRange, Severity};
    use pretty_assertions::assert_eq;

    fn diag(start: usize) -> DiagnosticRef {
        Diagnostic::new(DiagnosticRange::new(start, start + 1), Severity::Info, "i").into()
    }

    fn ids_of<T>(items: &[ListItem<T>]) -> Vec<ItemId> {
        items.iter().map(|i| i.id).collect()
    }

    #[test]
    fn test_initial_reconcile_inserts_everything() {
        let set = RangeAnchorSet::from_diagnostics([diag(5), diag(1)], 10);
        let mut ids = ItemIds::new();
        let out = reconcile(Vec::new(), &set, None, &mut ids, |e| e.from());

        assert_eq!(out.items.len(), 2);
        assert_eq!(out.items[0].rendered, 1);
        assert_eq!(
            out.edits,
            vec![
                ListEdit::Insert { at: 0, id: ItemId(0) },
                ListEdit::Insert { at: 1, id: ItemId(1) },
            ]
        );
    }

    #[test]
    fn test_unchanged_set_produces_no_edits() {
        let set = RangeAnchorSet::from_diagnostics([diag(1), diag(3)], 10);
        let mut ids = ItemIds::new();
        let first = reconcile(Vec::new(), &set, None, &mut ids, |_| ());
        let before = ids_of(&first.items);

        let second = reconcile(first.items, &set, None, &mut ids, |_| ());
        assert!(!second.changed());
        assert_eq!(ids_of(&second.items), before);
    }

    #[test]
    fn test_trailing_items_are_removed() {
        let a = diag(1);
        let b = diag(3);
        let mut ids = ItemIds::new();
        let full = RangeAnchorSet::from_diagnostics([a.clone(), b], 10);
        let first = reconcile(Vec::new(), &full, None, &mut ids, |_| ());

        let shorter = RangeAnchorSet::from_diagnostics([a], 10);
        let second = reconcile(first.items, &shorter, None, &mut ids, |_| ());
        assert_eq!(second.edits, vec![ListEdit::Remove { at: 1, count: 1 }]);
    }

    #[test]
    fn test_selected_index_and_anchor_refresh() {
        let a = diag(1);
        let b = diag(3);
        let mut ids = ItemIds::new();
        let set = RangeAnchorSet::from_diagnostics([a, b.clone()], 10);
        let first = reconcile(Vec::new(), &set, None, &mut ids, |_| ());

        let moved = set.remap(&crate::ChangeSet::insert(10, 0, "xx").unwrap());
        let selected = SelectedDiagnostic {
            from: 5,
            to: 6,
            diagnostic: b,
        };
        let second = reconcile(first.items, &moved, Some(&selected), &mut ids, |_| ());
        assert_eq!(second.selected_index, Some(1));
        assert_eq!(second.items[1].anchor, Anchor::Span { from: 5, to: 6 });
    }

    #[test]
    fn test_apply_edits_replays_script() {
        let (a, b, c, d) = (diag(1), diag(2), diag(3), diag(4));
        let mut ids = ItemIds::new();
        let old = RangeAnchorSet::from_diagnostics([a.clone(), b, c.clone()], 10);
        let first = reconcile(Vec::new(), &old, None, &mut ids, |_| ());
        let mut mirror = ids_of(&first.items);

        let new = RangeAnchorSet::from_diagnostics([a, c, d], 10);
        let second = reconcile(first.items, &new, None, &mut ids, |_| ());
        apply_edits(&mut mirror, &second.edits);
        assert_eq!(mirror, ids_of(&second.items));
    }
}
