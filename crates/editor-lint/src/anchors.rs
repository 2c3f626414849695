//! Position-anchored diagnostics.
//!
//! A [`RangeAnchorSet`] is an immutable, ordered set of diagnostics anchored to document
//! positions. Every transition produces a new set; existing sets are never mutated, so a
//! [`LintState`](crate::LintState) snapshot stays valid for as long as someone holds it.
//!
//! Entries are kept sorted by `(from, to)` (stable for equal ranges), together with a prefix
//! maximum of `to`, which lets queries skip everything that ends before the queried range.
//! Query complexity: O(log n + k).

use crate::delta::{Bias, ChangeSet, MapMode};
use crate::diagnostics::{DiagnosticRef, Severity};
use std::ops::ControlFlow;
use std::sync::Arc;

/// Where a diagnostic sits in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// A non-empty range, painted as an underline over `from..to`.
    Span {
        /// Start offset (inclusive).
        from: usize,
        /// End offset (exclusive).
        to: usize,
    },
    /// A zero-width position, painted as a marker.
    Point {
        /// Offset of the marker.
        at: usize,
    },
}

impl Anchor {
    /// Build an anchor for `from..to`: a span when non-empty, a point otherwise.
    pub fn new(from: usize, to: usize) -> Self {
        if from < to {
            Anchor::Span { from, to }
        } else {
            Anchor::Point { at: from }
        }
    }

    /// Start offset.
    pub fn from(&self) -> usize {
        match *self {
            Anchor::Span { from, .. } => from,
            Anchor::Point { at } => at,
        }
    }

    /// End offset.
    pub fn to(&self) -> usize {
        match *self {
            Anchor::Span { to, .. } => to,
            Anchor::Point { at } => at,
        }
    }

    /// Returns `true` for point anchors.
    pub fn is_point(&self) -> bool {
        matches!(self, Anchor::Point { .. })
    }

    /// Carry the anchor through `changes`; `None` means the anchored text was deleted.
    fn map(self, changes: &ChangeSet) -> Option<Anchor> {
        match self {
            Anchor::Span { from, to } => {
                if changes.covers_by_deletion(from, to) {
                    return None;
                }
                let new_from = changes.map_position(from, Bias::After);
                let new_to = changes.map_position(to, Bias::Before);
                Some(Anchor::new(new_from, new_to.max(new_from)))
            }
            Anchor::Point { at } => changes
                .map_position_tracking(at, Bias::After, MapMode::TrackDel)
                .map(|at| Anchor::Point { at }),
        }
    }
}

/// A diagnostic together with its current anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchoredDiagnostic {
    /// Current position of the diagnostic.
    pub anchor: Anchor,
    /// The anchored diagnostic.
    pub diagnostic: DiagnosticRef,
}

impl AnchoredDiagnostic {
    /// Start offset.
    pub fn from(&self) -> usize {
        self.anchor.from()
    }

    /// End offset.
    pub fn to(&self) -> usize {
        self.anchor.to()
    }

    /// Severity of the diagnostic.
    pub fn severity(&self) -> Severity {
        self.diagnostic.severity
    }
}

/// Immutable ordered set of anchored diagnostics. Cloning is O(1).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeAnchorSet {
    entries: Arc<[AnchoredDiagnostic]>,
    /// `prefix_max_end[i] = max(entries[0..=i].to)`
    prefix_max_end: Arc<[usize]>,
}

impl RangeAnchorSet {
    /// An empty set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Anchor `diagnostics` in a document of `doc_len` characters.
    ///
    /// Out-of-range or reversed ranges are clamped into `0..=doc_len` instead of rejecting the
    /// whole batch.
    pub fn from_diagnostics<I>(diagnostics: I, doc_len: usize) -> Self
    where
        I: IntoIterator<Item = DiagnosticRef>,
    {
        let entries = diagnostics
            .into_iter()
            .map(|diagnostic| {
                let range = diagnostic.range;
                let from = range.start.min(doc_len);
                let to = range.end.min(doc_len).max(from);
                if from != range.start || to != range.end {
                    tracing::debug!(
                        start = range.start,
                        end = range.end,
                        from,
                        to,
                        doc_len,
                        "clamped diagnostic range"
                    );
                }
                AnchoredDiagnostic {
                    anchor: Anchor::new(from, to),
                    diagnostic,
                }
            })
            .collect();
        Self::from_entries(entries)
    }

    fn from_entries(mut entries: Vec<AnchoredDiagnostic>) -> Self {
        entries.sort_by_key(|e| (e.from(), e.to()));

        let mut max_end = 0;
        let prefix_max_end: Vec<usize> = entries
            .iter()
            .map(|e| {
                max_end = max_end.max(e.to());
                max_end
            })
            .collect();

        Self {
            entries: entries.into(),
            prefix_max_end: prefix_max_end.into(),
        }
    }

    /// Number of anchored diagnostics.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in `(from, to)` order.
    pub fn iter(&self) -> std::slice::Iter<'_, AnchoredDiagnostic> {
        self.entries.iter()
    }

    /// First entry in document order.
    pub fn first(&self) -> Option<&AnchoredDiagnostic> {
        self.entries.first()
    }

    /// Visit entries that overlap or touch `from..=to`, in `(from, to)` order.
    ///
    /// The visitor stops the walk by returning [`ControlFlow::Break`].
    pub fn query<'a, F>(&'a self, from: usize, to: usize, mut visit: F)
    where
        F: FnMut(&'a AnchoredDiagnostic) -> ControlFlow<()>,
    {
        // Entries past `end` start after the queried range.
        let end = self.entries.partition_point(|e| e.from() <= to);
        // Entries before `start` (and everything before them) end before the queried range.
        let start = self.prefix_max_end[..end].partition_point(|&max_end| max_end < from);

        for entry in &self.entries[start..end] {
            if entry.to() < from {
                continue;
            }
            if visit(entry).is_break() {
                return;
            }
        }
    }

    /// Collect the entries [`query`](Self::query) would visit.
    pub fn query_all(&self, from: usize, to: usize) -> Vec<&AnchoredDiagnostic> {
        let mut found = Vec::new();
        self.query(from, to, |entry| {
            found.push(entry);
            ControlFlow::Continue(())
        });
        found
    }

    /// First entry ending at or after `after` whose diagnostic is `diagnostic` (any diagnostic
    /// when `None`).
    pub fn find(
        &self,
        diagnostic: Option<&DiagnosticRef>,
        after: usize,
    ) -> Option<&AnchoredDiagnostic> {
        let mut found = None;
        self.query(after, usize::MAX, |entry| match diagnostic {
            Some(d) if !entry.diagnostic.same(d) => ControlFlow::Continue(()),
            _ => {
                found = Some(entry);
                ControlFlow::Break(())
            }
        });
        found
    }

    /// Carry every anchor through `changes`, dropping diagnostics whose text was deleted.
    pub fn remap(&self, changes: &ChangeSet) -> Self {
        if changes.is_empty() {
            return self.clone();
        }

        let mut dropped = 0usize;
        let entries: Vec<AnchoredDiagnostic> = self
            .entries
            .iter()
            .filter_map(|entry| match entry.anchor.map(changes) {
                Some(anchor) => Some(AnchoredDiagnostic {
                    anchor,
                    diagnostic: entry.diagnostic.clone(),
                }),
                None => {
                    dropped += 1;
                    None
                }
            })
            .collect();

        if dropped > 0 {
            tracing::debug!(dropped, remaining = entries.len(), "anchors deleted by edit");
        }
        Self::from_entries(entries)
    }

    /// Union of two sets. Entries with equal ranges keep `self`'s entries first.
    pub fn merge(&self, other: &RangeAnchorSet) -> Self {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        let entries = self.iter().chain(other.iter()).cloned().collect();
        Self::from_entries(entries)
    }
}
