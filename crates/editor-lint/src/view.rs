//! Editor view with optional linting.
//!
//! [`EditorView`] is the host-facing surface: a document, a cursor, and an optionally attached
//! [`LintSession`]. Commands that only make sense with linting attached return
//! [`CommandStatus::NotApplicable`] instead of failing when it is not.

use crate::config::LintConfig;
use crate::delta::{Bias, ChangeSet};
use crate::diagnostics::{DiagnosticRange, DiagnosticRef};
use crate::document::Document;
use crate::error::LintError;
use crate::reducer::Transaction;
use crate::session::{DiagnosticSource, LintSession, PollOutcome};
use crate::state::SelectedDiagnostic;
use std::ops::Range;
use std::time::Instant;

/// Whether a command did anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// The command ran.
    Applied,
    /// The command does not apply in the current state.
    NotApplicable,
}

/// A document view that linting can be attached to.
#[derive(Debug)]
pub struct EditorView<S> {
    document: Document,
    cursor: Range<usize>,
    lint: Option<LintSession<S>>,
}

impl<S: DiagnosticSource> EditorView<S> {
    /// Create a view over `text` with the cursor at the start.
    pub fn new(text: &str) -> Self {
        Self {
            document: Document::new(text),
            cursor: 0..0,
            lint: None,
        }
    }

    /// The document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Current cursor (selection) range.
    pub fn cursor(&self) -> Range<usize> {
        self.cursor.clone()
    }

    /// Move the cursor, clamped to the document.
    pub fn set_cursor(&mut self, cursor: Range<usize>) {
        let len = self.document.len_chars();
        let start = cursor.start.min(len);
        self.cursor = start..cursor.end.clamp(start, len);
    }

    /// The attached lint session.
    pub fn lint(&self) -> Option<&LintSession<S>> {
        self.lint.as_ref()
    }

    /// Mutable access to the attached lint session.
    pub fn lint_mut(&mut self) -> Option<&mut LintSession<S>> {
        self.lint.as_mut()
    }

    /// Attach linting, replacing any previous session, and arm the first run.
    pub fn attach_linting(&mut self, source: S, config: LintConfig, now: Instant) {
        let mut session = LintSession::new(source, config);
        session.start(now);
        if self.lint.replace(session).is_some() {
            tracing::debug!("replaced existing lint session");
        }
    }

    /// Detach linting and return the session.
    pub fn detach_linting(&mut self) -> Option<LintSession<S>> {
        self.lint.take()
    }

    /// Apply an edit to the document, the cursor, and the lint state.
    pub fn edit(&mut self, changes: &ChangeSet, now: Instant) -> Result<(), LintError> {
        self.document.apply(changes)?;
        let start = changes.map_position(self.cursor.start, Bias::After);
        let end = changes.map_position(self.cursor.end, Bias::After).max(start);
        self.cursor = start..end;

        if let Some(session) = self.lint.as_mut() {
            session.document_changed(changes, now);
        }
        Ok(())
    }

    /// Drive the lint scheduler.
    pub fn poll(&mut self, now: Instant) -> Result<PollOutcome, LintError> {
        match self.lint.as_mut() {
            Some(session) => session.poll(&self.document, now),
            None => Ok(PollOutcome::Idle),
        }
    }

    /// Lint now instead of waiting for the quiet period.
    pub fn force_linting(&mut self) -> Result<CommandStatus, LintError> {
        let Some(session) = self.lint.as_mut() else {
            return Ok(CommandStatus::NotApplicable);
        };
        session.force(&self.document)?;
        Ok(CommandStatus::Applied)
    }

    /// Open the diagnostics panel.
    pub fn open_panel(&mut self) -> CommandStatus {
        let doc_len = self.document.len_chars();
        match self.lint.as_mut() {
            Some(session) => {
                session.open_panel(doc_len);
                CommandStatus::Applied
            }
            None => CommandStatus::NotApplicable,
        }
    }

    /// Close the diagnostics panel.
    pub fn close_panel(&mut self) -> CommandStatus {
        let doc_len = self.document.len_chars();
        match self.lint.as_mut() {
            Some(session) if session.state().panel_open() => {
                session.close_panel(doc_len);
                CommandStatus::Applied
            }
            _ => CommandStatus::NotApplicable,
        }
    }

    /// Move the cursor to the next diagnostic and select it.
    pub fn next_diagnostic(&mut self) -> CommandStatus {
        let target = self
            .lint
            .as_ref()
            .and_then(|s| s.state().next_diagnostic(self.cursor.clone()));
        self.jump_to(target)
    }

    /// Move the cursor to the previous diagnostic and select it.
    pub fn previous_diagnostic(&mut self) -> CommandStatus {
        let target = self
            .lint
            .as_ref()
            .and_then(|s| s.state().previous_diagnostic(self.cursor.clone()));
        self.jump_to(target)
    }

    fn jump_to(&mut self, target: Option<SelectedDiagnostic>) -> CommandStatus {
        let doc_len = self.document.len_chars();
        let (Some(session), Some(target)) = (self.lint.as_mut(), target) else {
            return CommandStatus::NotApplicable;
        };
        self.cursor = target.from..target.to;
        let selected = session.state().with_selected(Some(target));
        session.dispatch(&Transaction::replace_state(selected), doc_len);
        CommandStatus::Applied
    }

    /// Run action `index` of `diagnostic` against its current range.
    ///
    /// Does nothing if linting is detached or the diagnostic is no longer anchored.
    pub fn apply_action(
        &mut self,
        diagnostic: &DiagnosticRef,
        index: usize,
        now: Instant,
    ) -> Result<CommandStatus, LintError> {
        let action = diagnostic
            .actions
            .get(index)
            .ok_or(LintError::UnknownAction(index))?;
        let Some(entry) = self
            .lint
            .as_ref()
            .and_then(|s| s.state().anchors().find(Some(diagnostic), 0))
        else {
            return Ok(CommandStatus::NotApplicable);
        };

        let range = DiagnosticRange::new(entry.from(), entry.to());
        tracing::debug!(
            action = %action.name,
            from = range.start,
            to = range.end,
            "applying diagnostic action"
        );
        if let Some(changes) = action.apply(&self.document, range) {
            self.edit(&changes, now)?;
        }
        Ok(CommandStatus::Applied)
    }
}
