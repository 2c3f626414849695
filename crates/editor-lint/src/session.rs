//! Linting session.
//!
//! A [`LintSession`] ties the pieces together for one attached document:
//!
//! - it owns the current [`LintState`] and runs every transaction through [`reduce`];
//! - it feeds document changes to the [`ReLintScheduler`] and, when the quiet period has
//!   elapsed, runs the [`DiagnosticSource`] and publishes the result;
//! - it keeps a version number and notifies subscribers of every state change.
//!
//! Synchronous hosts call [`LintSession::poll`] whenever [`LintSession::next_wakeup`] is
//! reached. Hosts that run the source elsewhere use [`LintSession::take_due_request`] and
//! report back with [`LintSession::complete_request`]; results of superseded requests are
//! discarded.

use crate::config::LintConfig;
use crate::delta::ChangeSet;
use crate::diagnostics::Diagnostic;
use crate::document::Document;
use crate::error::LintError;
use crate::reducer::{LintEffect, Transaction, reduce};
use crate::scheduler::{LintRequestId, ReLintScheduler, TimerOutcome};
use crate::state::LintState;
use std::sync::Arc;
use std::time::Instant;

/// Something that produces diagnostics for a document snapshot.
///
/// Sources must not depend on the linting session's own state.
pub trait DiagnosticSource {
    /// Error returned when linting fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Produce diagnostics for `document`, in any order.
    fn lint(&mut self, document: &Document) -> Result<Vec<Diagnostic>, Self::Error>;
}

/// A [`DiagnosticSource`] backed by a closure. Built with [`source_fn`].
#[derive(Debug, Clone)]
pub struct FnSource<F>(F);

/// Wrap a closure as a [`DiagnosticSource`].
pub fn source_fn<F, E>(f: F) -> FnSource<F>
where
    F: FnMut(&Document) -> Result<Vec<Diagnostic>, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    FnSource(f)
}

impl<F, E> DiagnosticSource for FnSource<F>
where
    F: FnMut(&Document) -> Result<Vec<Diagnostic>, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    type Error = E;

    fn lint(&mut self, document: &Document) -> Result<Vec<Diagnostic>, E> {
        (self.0)(document)
    }
}

/// Kind of lint state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintChangeKind {
    /// A new diagnostic set was published.
    DiagnosticsChanged,
    /// A document edit moved the anchors.
    AnchorsRemapped,
    /// The selected diagnostic changed.
    SelectionChanged,
    /// The panel was opened or closed.
    PanelToggled,
}

/// Lint state change record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintStateChange {
    /// Change kind
    pub kind: LintChangeKind,
    /// Old version number
    pub old_version: u64,
    /// New version number
    pub new_version: u64,
}

/// Lint state change callback function type
pub type LintChangeCallback = Box<dyn FnMut(&LintStateChange) + Send>;

/// Result of [`LintSession::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Nothing is scheduled.
    Idle,
    /// Nothing to do yet; poll again at the given instant.
    Pending(Instant),
    /// The source ran and its diagnostics were published.
    Linted {
        /// Request that produced the diagnostics.
        request: LintRequestId,
        /// Number of diagnostics anchored.
        diagnostics: usize,
    },
}

/// Linting attached to one document.
pub struct LintSession<S> {
    source: S,
    config: LintConfig,
    state: Arc<LintState>,
    scheduler: ReLintScheduler,
    version: u64,
    callbacks: Vec<LintChangeCallback>,
    focus_requested: bool,
}

impl<S: DiagnosticSource> LintSession<S> {
    /// Create a session. Call [`start`](Self::start) to arm the first run.
    pub fn new(source: S, config: LintConfig) -> Self {
        let scheduler = ReLintScheduler::new(config.delay(), config.tolerance());
        Self {
            source,
            config,
            state: Arc::new(LintState::default()),
            scheduler,
            version: 0,
            callbacks: Vec::new(),
            focus_requested: false,
        }
    }

    /// Arm the initial lint run.
    pub fn start(&mut self, now: Instant) {
        self.scheduler.start(now);
    }

    /// Current lint state.
    pub fn state(&self) -> &Arc<LintState> {
        &self.state
    }

    /// Session configuration.
    pub fn config(&self) -> &LintConfig {
        &self.config
    }

    /// Debounce scheduler.
    pub fn scheduler(&self) -> &ReLintScheduler {
        &self.scheduler
    }

    /// The diagnostic source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the diagnostic source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Get current version number
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Check if state has changed since a version
    pub fn has_changed_since(&self, version: u64) -> bool {
        self.version > version
    }

    /// Subscribe to lint state change notifications
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&LintStateChange) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// When the host should call [`poll`](Self::poll) next.
    pub fn next_wakeup(&self) -> Option<Instant> {
        self.scheduler.timer_due()
    }

    /// Run `transaction` through the reducer. Returns `true` if the state changed.
    ///
    /// `doc_len` is the document length after the transaction.
    pub fn dispatch(&mut self, transaction: &Transaction, doc_len: usize) -> bool {
        let next = reduce(&self.state, transaction, doc_len);
        if Arc::ptr_eq(&next, &self.state) {
            return false;
        }

        let kind = match &transaction.effect {
            Some(LintEffect::SetDiagnostics(_)) => LintChangeKind::DiagnosticsChanged,
            Some(LintEffect::ReplaceState(_)) if next.panel_open() != self.state.panel_open() => {
                LintChangeKind::PanelToggled
            }
            Some(LintEffect::ReplaceState(_)) => LintChangeKind::SelectionChanged,
            None => LintChangeKind::AnchorsRemapped,
        };
        self.state = next;
        self.mark_changed(kind);
        true
    }

    /// Remap the state through a document edit and restart the quiet period.
    pub fn document_changed(&mut self, changes: &ChangeSet, now: Instant) {
        if changes.is_empty() {
            return;
        }
        self.dispatch(&Transaction::edit(changes.clone()), changes.len_after());
        self.scheduler.note_document_changed(now);
    }

    /// Publish a diagnostic set, applying the severity filter and the auto panel setting.
    ///
    /// Returns the number of anchored diagnostics.
    pub fn set_diagnostics(&mut self, diagnostics: Vec<Diagnostic>, doc_len: usize) -> usize {
        let total = diagnostics.len();
        let kept: Vec<Diagnostic> = diagnostics
            .into_iter()
            .filter(|d| self.config.accepts(d.severity))
            .collect();
        if kept.len() < total {
            tracing::debug!(dropped = total - kept.len(), "diagnostics below min severity");
        }

        self.dispatch(&Transaction::set_diagnostics(kept), doc_len);
        let count = self.state.diagnostic_count();

        if self.config.auto_panel {
            let want_open = count > 0;
            if want_open != self.state.panel_open() {
                let toggled = self.state.with_panel_open(want_open);
                self.dispatch(&Transaction::replace_state(toggled), doc_len);
            }
        }
        count
    }

    /// Handle the scheduler timer at `now`, running the source if the quiet period elapsed.
    ///
    /// A source error is returned as [`LintError::Source`]; the previous diagnostics stay
    /// published and the scheduler goes back to idle.
    pub fn poll(&mut self, document: &Document, now: Instant) -> Result<PollOutcome, LintError> {
        match self.scheduler.on_timer(now) {
            TimerOutcome::Idle => Ok(PollOutcome::Idle),
            TimerOutcome::NotDue(due) => Ok(PollOutcome::Pending(due)),
            TimerOutcome::Rearmed(remaining) => Ok(PollOutcome::Pending(now + remaining)),
            TimerOutcome::Fire(request) => self.run(request, document),
        }
    }

    /// Run the source right away, skipping the quiet period.
    pub fn force(&mut self, document: &Document) -> Result<PollOutcome, LintError> {
        let request = self.scheduler.force();
        self.run(request, document)
    }

    fn run(
        &mut self,
        request: LintRequestId,
        document: &Document,
    ) -> Result<PollOutcome, LintError> {
        let result = self
            .source
            .lint(document)
            .map_err(|err| LintError::Source(Box::new(err)));
        self.complete_request(request, result, document.len_chars())?;
        Ok(PollOutcome::Linted {
            request,
            diagnostics: self.state.diagnostic_count(),
        })
    }

    /// Take a due lint request without running the source.
    ///
    /// The host runs the source itself and reports back through
    /// [`complete_request`](Self::complete_request).
    pub fn take_due_request(&mut self, now: Instant) -> Option<LintRequestId> {
        match self.scheduler.on_timer(now) {
            TimerOutcome::Fire(request) => Some(request),
            _ => None,
        }
    }

    /// Report the outcome of `request`.
    ///
    /// Returns `Ok(false)` if the request was superseded by an edit or a later request; its
    /// result is discarded. A failed request keeps the previous diagnostics.
    pub fn complete_request(
        &mut self,
        request: LintRequestId,
        result: Result<Vec<Diagnostic>, LintError>,
        doc_len: usize,
    ) -> Result<bool, LintError> {
        if !self.scheduler.complete(request) {
            tracing::warn!(request = request.get(), "discarding stale lint result");
            return Ok(false);
        }

        match result {
            Ok(diagnostics) => {
                let count = self.set_diagnostics(diagnostics, doc_len);
                tracing::debug!(request = request.get(), count, "lint run published");
                Ok(true)
            }
            Err(err) => {
                tracing::warn!(request = request.get(), error = %err, "lint run failed");
                Err(err)
            }
        }
    }

    /// Open the diagnostics panel and ask the renderer to focus it.
    pub fn open_panel(&mut self, doc_len: usize) {
        self.focus_requested = true;
        if !self.state.panel_open() {
            let opened = self.state.with_panel_open(true);
            self.dispatch(&Transaction::replace_state(opened), doc_len);
        }
    }

    /// Close the diagnostics panel.
    pub fn close_panel(&mut self, doc_len: usize) {
        if self.state.panel_open() {
            let closed = self.state.with_panel_open(false);
            self.dispatch(&Transaction::replace_state(closed), doc_len);
        }
    }

    /// Consume a pending panel focus request.
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }

    fn mark_changed(&mut self, kind: LintChangeKind) {
        let old_version = self.version;
        self.version += 1;
        let change = LintStateChange {
            kind,
            old_version,
            new_version: self.version,
        };
        for callback in &mut self.callbacks {
            callback(&change);
        }
    }
}

impl<S> std::fmt::Debug for LintSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LintSession")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("scheduler", &self.scheduler)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticRange, Severity};
    use crate::scheduler::SchedulerPhase;
    use std::convert::Infallible;
    use std::sync::Mutex;
    use std::time::Duration;

    fn warning(start: usize, end: usize) -> Diagnostic {
        Diagnostic::new(DiagnosticRange::new(start, end), Severity::Warning, "w")
    }

    fn fixed(
        diagnostics: Vec<Diagnostic>,
    ) -> FnSource<impl FnMut(&Document) -> Result<Vec<Diagnostic>, Infallible>> {
        source_fn(move |_: &Document| -> Result<Vec<Diagnostic>, Infallible> {
            Ok(diagnostics.clone())
        })
    }

    #[test]
    fn test_poll_runs_source_after_delay() {
        let doc = Document::new("hello world");
        let mut session = LintSession::new(fixed(vec![warning(0, 5)]), LintConfig::default());
        let t0 = Instant::now();
        session.start(t0);

        assert_eq!(
            session.poll(&doc, t0).unwrap(),
            PollOutcome::Pending(t0 + Duration::from_millis(500))
        );
        let outcome = session.poll(&doc, t0 + Duration::from_millis(500)).unwrap();
        assert!(matches!(outcome, PollOutcome::Linted { diagnostics: 1, .. }));
        assert_eq!(session.scheduler().phase(), SchedulerPhase::Idle);
        assert_eq!(session.poll(&doc, t0 + Duration::from_secs(5)).unwrap(), PollOutcome::Idle);
    }

    #[test]
    fn test_subscribers_see_each_change() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut session = LintSession::new(fixed(Vec::new()), LintConfig::default());
        session.subscribe(move |change| sink.lock().unwrap().push(change.kind));

        session.set_diagnostics(vec![warning(0, 1)], 10);
        session.open_panel(10);
        session.document_changed(&ChangeSet::insert(10, 0, "ab").unwrap(), Instant::now());

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                LintChangeKind::DiagnosticsChanged,
                LintChangeKind::PanelToggled,
                LintChangeKind::AnchorsRemapped,
            ]
        );
        assert_eq!(session.version(), 3);
        assert!(session.has_changed_since(2));
        assert!(!session.has_changed_since(3));
    }

    #[test]
    fn test_auto_panel_follows_diagnostics() {
        let config = LintConfig {
            auto_panel: true,
            ..LintConfig::default()
        };
        let mut session = LintSession::new(fixed(Vec::new()), config);

        session.set_diagnostics(vec![warning(0, 1)], 10);
        assert!(session.state().panel_open());
        session.set_diagnostics(Vec::new(), 10);
        assert!(!session.state().panel_open());
    }

    #[test]
    fn test_min_severity_drops_info() {
        let config = LintConfig {
            min_severity: Some(Severity::Warning),
            ..LintConfig::default()
        };
        let mut session = LintSession::new(fixed(Vec::new()), config);
        let info = Diagnostic::new(DiagnosticRange::new(0, 1), Severity::Info, "i");
        let count = session.set_diagnostics(vec![info, warning(2, 3)], 10);
        assert_eq!(count, 1);
    }

    #[test]
    fn test_open_panel_requests_focus_once() {
        let mut session = LintSession::new(fixed(Vec::new()), LintConfig::default());
        session.open_panel(0);
        assert!(session.state().panel_open());
        assert!(session.take_focus_request());
        assert!(!session.take_focus_request());

        session.close_panel(0);
        assert!(!session.state().panel_open());
    }
}
