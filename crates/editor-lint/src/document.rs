//! Rope-backed document text.
//!
//! The linting core only needs a small slice of an editor's text model: the document length,
//! line lookups for gutter markers, and a way to apply a [`ChangeSet`]. [`Document`] provides
//! exactly that on top of `ropey`, using character offsets throughout.

use crate::delta::ChangeSet;
use crate::error::LintError;
use ropey::Rope;
use std::ops::Range;

/// An immutable-by-default text document addressed in character offsets.
#[derive(Debug, Clone, Default)]
pub struct Document {
    rope: Rope,
}

impl Document {
    /// Create a document from text.
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Total character count.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns `true` if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Full document text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Text in `range` (character offsets, clamped to the document).
    pub fn slice(&self, range: Range<usize>) -> String {
        let len = self.rope.len_chars();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        self.rope.slice(start..end).to_string()
    }

    /// Number of lines (`N` newlines make `N + 1` lines).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Zero-based line containing `offset`.
    pub fn line_of(&self, offset: usize) -> usize {
        self.rope.char_to_line(offset.min(self.rope.len_chars()))
    }

    /// Character offset of the start of `line` (the document end for lines past the end).
    pub fn line_start(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(line)
    }

    /// Text of `line` without its trailing newline.
    pub fn line_text(&self, line: usize) -> Option<String> {
        if line >= self.rope.len_lines() {
            return None;
        }
        let mut text = self.rope.line(line).to_string();
        if text.ends_with('\n') {
            text.pop();
            if text.ends_with('\r') {
                text.pop();
            }
        }
        Some(text)
    }

    /// Apply a change set built against this document.
    pub fn apply(&mut self, changes: &ChangeSet) -> Result<(), LintError> {
        let actual = self.rope.len_chars();
        if changes.len_before() != actual {
            return Err(LintError::LengthMismatch {
                expected: changes.len_before(),
                actual,
            });
        }

        // Back to front so earlier offsets stay valid.
        for edit in changes.edits().iter().rev() {
            if edit.from < edit.to {
                self.rope.remove(edit.from..edit.to);
            }
            if !edit.insert().is_empty() {
                self.rope.insert(edit.from, edit.insert());
            }
        }
        Ok(())
    }
}
