//! Per-line gutter markers.

use crate::anchors::AnchoredDiagnostic;
use crate::diagnostics::Severity;
use crate::document::Document;
use crate::state::LintState;

/// Gutter marker for one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMarker<'a> {
    /// Zero-based line index.
    pub line: usize,
    /// Highest severity among the line's diagnostics.
    pub severity: Severity,
    /// Diagnostics starting on this line, in document order.
    pub diagnostics: Vec<&'a AnchoredDiagnostic>,
}

impl LintState {
    /// Group the anchored diagnostics by the line their range starts on.
    pub fn line_markers<'a>(&'a self, document: &Document) -> Vec<LineMarker<'a>> {
        let mut markers: Vec<LineMarker<'a>> = Vec::new();

        for entry in self.anchors().iter() {
            let line = document.line_of(entry.from());
            // Entries are sorted by start offset, so a line's entries are contiguous.
            match markers.last_mut() {
                Some(marker) if marker.line == line => {
                    marker.severity = marker.severity.max(entry.severity());
                    marker.diagnostics.push(entry);
                }
                _ => markers.push(LineMarker {
                    line,
                    severity: entry.severity(),
                    diagnostics: vec![entry],
                }),
            }
        }
        markers
    }
}
