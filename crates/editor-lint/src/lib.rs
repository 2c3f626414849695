#![warn(missing_docs)]
//! Editor Lint - Headless Diagnostics Overlay for Text Editors
//!
//! # Overview
//!
//! `editor-lint` keeps asynchronous, position-anchored diagnostics (errors, warnings, info) in
//! sync with a document that is being edited. It does not render anything: the upper layer
//! paints spans, point markers, tooltips and the diagnostics panel from the state exposed here.
//!
//! # Core Features
//!
//! - **Anchored Diagnostics**: Sorted interval set, remapped through every edit, O(log n + k) queries
//! - **Immutable State**: Every transaction produces a new `LintState` snapshot; unchanged state keeps its `Arc`
//! - **Sticky Selection**: The selected diagnostic follows edits and falls back to the nearest survivor
//! - **Debounced Re-linting**: Bursts of edits coalesce into one source run after a quiet period
//! - **Stale Result Rejection**: Request ids discard results superseded by later edits
//! - **List Reconciliation**: Single-pass edit scripts for the diagnostics panel with stable item ids
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  EditorView (commands)                      │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  LintSession (dispatch, poll, subscribe)    │  ← Session
//! ├──────────────────────┬──────────────────────┤
//! │  ReLintScheduler     │  DiagnosticPanel     │  ← Timing / List View
//! ├──────────────────────┴──────────────────────┤
//! │  reduce (LintState transitions)             │  ← State
//! ├─────────────────────────────────────────────┤
//! │  RangeAnchorSet (anchored diagnostics)      │  ← Anchors
//! ├─────────────────────────────────────────────┤
//! │  Document + ChangeSet (rope, mapping)       │  ← Text Substrate
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use editor_lint::{
//!     ChangeSet, Diagnostic, DiagnosticRange, Document, EditorView, LintConfig, Severity,
//!     source_fn,
//! };
//! use std::convert::Infallible;
//! use std::time::{Duration, Instant};
//!
//! let source = source_fn(|doc: &Document| -> Result<Vec<Diagnostic>, Infallible> {
//!     Ok(doc
//!         .text()
//!         .find("TODO")
//!         .map(|at| Diagnostic::new(DiagnosticRange::new(at, at + 4), Severity::Info, "todo"))
//!         .into_iter()
//!         .collect())
//! });
//!
//! let mut view = EditorView::new("// TODO");
//! let t0 = Instant::now();
//! view.attach_linting(source, LintConfig::default(), t0);
//! view.poll(t0 + Duration::from_millis(500)).unwrap();
//!
//! let state = view.lint().unwrap().state();
//! assert_eq!(state.diagnostic_count(), 1);
//!
//! // Anchors follow edits.
//! view.edit(&ChangeSet::insert(7, 0, "\n").unwrap(), t0).unwrap();
//! let entry = view.lint().unwrap().state().anchors().first().unwrap();
//! assert_eq!((entry.from(), entry.to()), (4, 8));
//! ```
//!
//! # Module Description
//!
//! - [`delta`] - Change sets and position mapping
//! - [`document`] - Rope based document text
//! - [`diagnostics`] - Diagnostic data model
//! - [`anchors`] - Anchored diagnostic set
//! - [`state`] - Lint state snapshots and navigation queries
//! - [`reducer`] - Lint state transitions
//! - [`scheduler`] - Debounce state machine
//! - [`reconcile`] - Diagnostics list reconciliation
//! - [`panel`] - Headless diagnostics panel
//! - [`session`] - Lint session and diagnostic sources
//! - [`view`] - Editor view commands

pub mod anchors;
pub mod config;
pub mod delta;
pub mod diagnostics;
pub mod document;
mod error;
mod gutter;
pub mod panel;
pub mod reconcile;
pub mod reducer;
pub mod scheduler;
pub mod session;
pub mod state;
pub mod view;

pub use anchors::{Anchor, AnchoredDiagnostic, RangeAnchorSet};
pub use config::LintConfig;
pub use delta::{Bias, ChangeSet, Edit, MapMode};
pub use diagnostics::{
    ActionFn, Diagnostic, DiagnosticAction, DiagnosticRange, DiagnosticRef, Severity,
};
pub use document::Document;
pub use error::LintError;
pub use gutter::LineMarker;
pub use panel::{DiagnosticPanel, PanelMove};
pub use reconcile::{ItemId, ItemIds, ListEdit, ListItem, Reconciliation, apply_edits, reconcile};
pub use reducer::{LintEffect, Transaction, reduce};
pub use scheduler::{
    DEFAULT_DELAY, DEFAULT_TOLERANCE, LintRequestId, ReLintScheduler, SchedulerPhase,
    TimerOutcome,
};
pub use session::{
    DiagnosticSource, FnSource, LintChangeCallback, LintChangeKind, LintSession, LintStateChange,
    PollOutcome, source_fn,
};
pub use state::{LintState, SelectedDiagnostic};
pub use view::{CommandStatus, EditorView};
