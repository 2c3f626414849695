//! Lint state snapshots.
//!
//! [`LintState`] is a pure value: the anchored diagnostics, whether the diagnostics panel is
//! open, and the currently selected diagnostic. Transitions never mutate a snapshot; they
//! produce a new one (see [`reduce`](crate::reduce)), so hosts can keep old snapshots around for
//! undo/redo or to diff against.

use crate::anchors::{AnchoredDiagnostic, RangeAnchorSet};
use crate::delta::Bias;
use crate::diagnostics::{DiagnosticRange, DiagnosticRef, Severity};
use std::ops::{ControlFlow, Range};

/// The selected diagnostic and its current position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedDiagnostic {
    /// Start offset (inclusive).
    pub from: usize,
    /// End offset (exclusive).
    pub to: usize,
    /// The selected diagnostic.
    pub diagnostic: DiagnosticRef,
}

impl SelectedDiagnostic {
    /// Current range of the selection.
    pub fn range(&self) -> DiagnosticRange {
        DiagnosticRange::new(self.from, self.to)
    }
}

impl From<&AnchoredDiagnostic> for SelectedDiagnostic {
    fn from(entry: &AnchoredDiagnostic) -> Self {
        Self {
            from: entry.from(),
            to: entry.to(),
            diagnostic: entry.diagnostic.clone(),
        }
    }
}

/// Immutable lint state snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintState {
    anchors: RangeAnchorSet,
    panel_open: bool,
    selected: Option<SelectedDiagnostic>,
}

impl LintState {
    /// Create a snapshot.
    pub fn new(
        anchors: RangeAnchorSet,
        panel_open: bool,
        selected: Option<SelectedDiagnostic>,
    ) -> Self {
        Self {
            anchors,
            panel_open,
            selected,
        }
    }

    /// Anchored diagnostics, in document order.
    pub fn anchors(&self) -> &RangeAnchorSet {
        &self.anchors
    }

    /// Whether the diagnostics panel is open.
    pub fn panel_open(&self) -> bool {
        self.panel_open
    }

    /// Currently selected diagnostic.
    pub fn selected(&self) -> Option<&SelectedDiagnostic> {
        self.selected.as_ref()
    }

    /// Copy of this snapshot with the panel flag set.
    pub fn with_panel_open(&self, panel_open: bool) -> Self {
        Self {
            panel_open,
            ..self.clone()
        }
    }

    /// Copy of this snapshot with a different selection.
    pub fn with_selected(&self, selected: Option<SelectedDiagnostic>) -> Self {
        Self {
            selected,
            ..self.clone()
        }
    }

    /// Number of anchored diagnostics.
    pub fn diagnostic_count(&self) -> usize {
        self.anchors.len()
    }

    /// Number of anchored diagnostics at `severity`.
    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.anchors
            .iter()
            .filter(|e| e.severity() == severity)
            .count()
    }

    /// Diagnostics under `pos`, as shown in a hover tooltip.
    ///
    /// `side` tells which neighbouring character the pointer is over: with [`Bias::Before`] a span
    /// ending at `pos` matches, with [`Bias::After`] a span starting at `pos` matches. Point
    /// diagnostics at `pos` always match.
    pub fn diagnostics_at(&self, pos: usize, side: Bias) -> Vec<&AnchoredDiagnostic> {
        let (query_from, query_to) = match side {
            Bias::Before => (pos.saturating_sub(1), pos),
            Bias::After => (pos, pos.saturating_add(1)),
        };

        let mut found = Vec::new();
        self.anchors.query(query_from, query_to, |entry| {
            let (from, to) = (entry.from(), entry.to());
            let hit = pos >= from
                && pos <= to
                && (from == to
                    || ((pos > from || side == Bias::After) && (pos < to || side == Bias::Before)));
            if hit {
                found.push(entry);
            }
            ControlFlow::Continue(())
        });
        found
    }

    /// The diagnostic after the cursor, wrapping around to the first one.
    ///
    /// Returns `None` when there are no diagnostics or the only candidate is already selected by
    /// `cursor`.
    pub fn next_diagnostic(&self, cursor: Range<usize>) -> Option<SelectedDiagnostic> {
        let next = self
            .anchors
            .find(None, cursor.end.saturating_add(1))
            .or_else(|| self.anchors.find(None, 0))?;
        if next.from() == cursor.start && next.to() == cursor.end {
            return None;
        }
        Some(next.into())
    }

    /// The diagnostic before the cursor, wrapping around to the last one.
    pub fn previous_diagnostic(&self, cursor: Range<usize>) -> Option<SelectedDiagnostic> {
        let mut previous: Option<&AnchoredDiagnostic> = None;
        let mut last: Option<&AnchoredDiagnostic> = None;

        for entry in self.anchors.iter() {
            if entry.to() < cursor.end && previous.is_none_or(|p| p.from() < entry.from()) {
                previous = Some(entry);
            }
            if last.is_none_or(|l| entry.from() > l.from()) {
                last = Some(entry);
            }
        }

        let last = last?;
        match previous {
            Some(previous) => Some(previous.into()),
            None if last.from() == cursor.start => None,
            None => Some(last.into()),
        }
    }
}
