//! Diagnostics data model.
//!
//! Diagnostics are produced by a [`DiagnosticSource`](crate::DiagnosticSource) and are never
//! mutated afterwards. Once handed to the linting core they are wrapped in a [`DiagnosticRef`],
//! which compares by identity: two diagnostics with the same text and range are still different
//! diagnostics. Positions drift with edits, so the current range of a diagnostic is always taken
//! from its anchor in the [`RangeAnchorSet`](crate::RangeAnchorSet), not from
//! [`Diagnostic::range`].

use crate::delta::ChangeSet;
use crate::document::Document;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// A half-open character-offset range (`start..end`) in the document.
///
/// `start == end` denotes a point diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DiagnosticRange {
    /// Range start offset (inclusive), in `char`s from the start of the document.
    pub start: usize,
    /// Range end offset (exclusive), in `char`s from the start of the document.
    pub end: usize,
}

impl DiagnosticRange {
    /// Create a new diagnostic range.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a zero-width range at `at`.
    pub fn point(at: usize) -> Self {
        Self { start: at, end: at }
    }

    /// Returns `true` for a zero-width range.
    pub fn is_point(&self) -> bool {
        self.start == self.end
    }
}

/// Diagnostic severity levels, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational diagnostics.
    Info,
    /// Warning diagnostics.
    Warning,
    /// Error diagnostics.
    Error,
}

impl Severity {
    /// Lowercase name, as used in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Callback of a [`DiagnosticAction`].
///
/// Receives the current document and the diagnostic's *current* anchored range, and returns the
/// change to apply (if any).
pub type ActionFn = dyn Fn(&Document, DiagnosticRange) -> Option<ChangeSet> + Send + Sync;

/// A named fix or command attached to a diagnostic.
#[derive(Clone)]
pub struct DiagnosticAction {
    /// Label shown to the user.
    pub name: String,
    apply: Arc<ActionFn>,
}

impl DiagnosticAction {
    /// Create an action.
    pub fn new<F>(name: impl Into<String>, apply: F) -> Self
    where
        F: Fn(&Document, DiagnosticRange) -> Option<ChangeSet> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            apply: Arc::new(apply),
        }
    }

    /// Run the action against `range`, the diagnostic's current position.
    pub fn apply(&self, document: &Document, range: DiagnosticRange) -> Option<ChangeSet> {
        (self.apply)(document, range)
    }
}

impl fmt::Debug for DiagnosticAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAction")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A single diagnostic item for the current document.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Range at construction time, in character offsets.
    pub range: DiagnosticRange,
    /// Diagnostic severity.
    pub severity: Severity,
    /// Optional diagnostic source (e.g. `"rustc"`).
    pub source: Option<String>,
    /// Diagnostic message.
    pub message: String,
    /// Actions offered for this diagnostic, in display order.
    pub actions: Vec<DiagnosticAction>,
}

impl Diagnostic {
    /// Create a diagnostic without source or actions.
    pub fn new(range: DiagnosticRange, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            range,
            severity,
            source: None,
            message: message.into(),
            actions: Vec::new(),
        }
    }

    /// Set the source label.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Append an action.
    pub fn with_action(mut self, action: DiagnosticAction) -> Self {
        self.actions.push(action);
        self
    }
}

/// Shared, identity-compared handle to a [`Diagnostic`].
#[derive(Debug, Clone)]
pub struct DiagnosticRef(Arc<Diagnostic>);

impl DiagnosticRef {
    /// Wrap a diagnostic, giving it a fresh identity.
    pub fn new(diagnostic: Diagnostic) -> Self {
        Self(Arc::new(diagnostic))
    }

    /// Returns `true` if both handles refer to the same diagnostic.
    pub fn same(&self, other: &DiagnosticRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<Diagnostic> for DiagnosticRef {
    fn from(diagnostic: Diagnostic) -> Self {
        Self::new(diagnostic)
    }
}

impl Deref for DiagnosticRef {
    type Target = Diagnostic;

    fn deref(&self) -> &Diagnostic {
        &self.0
    }
}

impl PartialEq for DiagnosticRef {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl Eq for DiagnosticRef {}

impl Hash for DiagnosticRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refs_compare_by_identity() {
        let diagnostic = Diagnostic::new(DiagnosticRange::new(1, 2), Severity::Error, "boom");
        let a = DiagnosticRef::new(diagnostic.clone());
        let b = DiagnosticRef::new(diagnostic);
        let a2 = a.clone();

        assert_eq!(a, a2);
        assert_ne!(a, b);
        assert_eq!(a.message, b.message);
    }

    #[test]
    fn test_severity_order_and_names() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
        assert_eq!(Severity::Warning.to_string(), "warning");
    }

    #[test]
    fn test_action_receives_current_range() {
        let action = DiagnosticAction::new("remove", |doc: &Document, range: DiagnosticRange| {
            ChangeSet::delete(doc.len_chars(), range.start, range.end).ok()
        });
        let doc = Document::new("abcdef");
        let changes = action.apply(&doc, DiagnosticRange::new(2, 4)).unwrap();
        assert_eq!(changes.len_after(), 4);
        assert_eq!(format!("{action:?}"), "DiagnosticAction { name: \"remove\", .. }");
    }
}
