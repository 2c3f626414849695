//! Lint state transitions.
//!
//! Every document transaction runs through [`reduce`], which maps the previous [`LintState`] to
//! the next one. A transaction triggers at most one of three transitions, checked in this
//! order:
//!
//! 1. [`LintEffect::SetDiagnostics`]: anchor a fresh diagnostic set; the selection resets to
//!    the first diagnostic in document order.
//! 2. [`LintEffect::ReplaceState`]: adopt a complete snapshot (panel toggles, selection moves).
//! 3. A plain document edit: remap the anchors and re-resolve the selection.
//!
//! When none applies the previous `Arc` is returned as is, so consumers can skip work with a
//! pointer comparison.

use crate::anchors::RangeAnchorSet;
use crate::delta::{Bias, ChangeSet};
use crate::diagnostics::DiagnosticRef;
use crate::state::{LintState, SelectedDiagnostic};
use std::sync::Arc;

/// A lint-specific payload attached to a transaction.
#[derive(Debug, Clone)]
pub enum LintEffect {
    /// Replace all diagnostics.
    SetDiagnostics(Vec<DiagnosticRef>),
    /// Replace the whole lint state.
    ReplaceState(LintState),
}

/// A document transaction as seen by the linting core.
#[derive(Debug, Clone, Default)]
pub struct Transaction {
    /// Document change made by the transaction, if any.
    pub changes: Option<ChangeSet>,
    /// Lint payload carried by the transaction, if any.
    pub effect: Option<LintEffect>,
}

impl Transaction {
    /// A transaction that only edits the document.
    pub fn edit(changes: ChangeSet) -> Self {
        Self {
            changes: Some(changes),
            effect: None,
        }
    }

    /// A transaction replacing all diagnostics.
    pub fn set_diagnostics<I>(diagnostics: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<DiagnosticRef>,
    {
        Self {
            changes: None,
            effect: Some(LintEffect::SetDiagnostics(
                diagnostics.into_iter().map(Into::into).collect(),
            )),
        }
    }

    /// A transaction replacing the whole lint state.
    pub fn replace_state(state: LintState) -> Self {
        Self {
            changes: None,
            effect: Some(LintEffect::ReplaceState(state)),
        }
    }

    /// Attach a document change to this transaction.
    pub fn with_changes(mut self, changes: ChangeSet) -> Self {
        self.changes = Some(changes);
        self
    }

    /// Returns `true` if the transaction changes the document.
    pub fn doc_changed(&self) -> bool {
        self.changes.as_ref().is_some_and(|c| !c.is_empty())
    }
}

/// Compute the lint state after `transaction`.
///
/// `doc_len` is the document length *after* the transaction and bounds freshly anchored
/// diagnostics.
pub fn reduce(prev: &Arc<LintState>, transaction: &Transaction, doc_len: usize) -> Arc<LintState> {
    match &transaction.effect {
        Some(LintEffect::SetDiagnostics(diagnostics)) => {
            let anchors = RangeAnchorSet::from_diagnostics(diagnostics.iter().cloned(), doc_len);
            let selected = anchors.first().map(SelectedDiagnostic::from);
            tracing::debug!(count = anchors.len(), "diagnostics replaced");
            Arc::new(LintState::new(anchors, prev.panel_open(), selected))
        }
        Some(LintEffect::ReplaceState(state)) => Arc::new(state.clone()),
        None => match &transaction.changes {
            Some(changes) if !changes.is_empty() => Arc::new(remap_state(prev, changes)),
            _ => Arc::clone(prev),
        },
    }
}

fn remap_state(prev: &LintState, changes: &ChangeSet) -> LintState {
    let anchors = prev.anchors().remap(changes);
    let selected = prev.selected().and_then(|selected| {
        let pos = changes.map_position(selected.from, Bias::After);
        let resolved = anchors
            .find(Some(&selected.diagnostic), pos)
            .or_else(|| anchors.find(None, pos))
            .map(SelectedDiagnostic::from);
        if resolved
            .as_ref()
            .is_none_or(|r| !r.diagnostic.same(&selected.diagnostic))
        {
            tracing::debug!(pos, found = resolved.is_some(), "selection fell back");
        }
        resolved
    });
    LintState::new(anchors, prev.panel_open(), selected)
}
