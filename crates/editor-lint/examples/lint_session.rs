//! Lint session example
//!
//! Attaches a toy "trailing whitespace" checker to an editor view, drives the debounce
//! scheduler with a simulated clock, and mirrors the diagnostics panel.

use editor_lint::{
    ChangeSet, Diagnostic, DiagnosticPanel, DiagnosticRange, Document, EditorView, LintConfig,
    ListEdit, PanelMove, PollOutcome, Severity, source_fn,
};
use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

fn trailing_whitespace(doc: &Document) -> Result<Vec<Diagnostic>, Infallible> {
    let mut found = Vec::new();
    for line in 0..doc.line_count() {
        let Some(text) = doc.line_text(line) else {
            continue;
        };
        let trimmed = text.trim_end().chars().count();
        let total = text.chars().count();
        if trimmed < total {
            let start = doc.line_start(line);
            found.push(
                Diagnostic::new(
                    DiagnosticRange::new(start + trimmed, start + total),
                    Severity::Warning,
                    "trailing whitespace",
                )
                .with_source("whitespace"),
            );
        }
    }
    Ok(found)
}

fn main() {
    println!("=== Lint session example ===\n");

    let t0 = Instant::now();
    let mut view = EditorView::new("fn main() {  \n    let x = 1;\n}   ");
    let config = LintConfig {
        auto_panel: true,
        ..LintConfig::default()
    };
    view.attach_linting(source_fn(trailing_whitespace), config, t0);

    let changes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&changes);
    if let Some(session) = view.lint_mut() {
        session.subscribe(move |change| {
            sink.lock().unwrap().push(format!(
                "{:?} (version {} -> {})",
                change.kind, change.old_version, change.new_version
            ));
        });
    }

    // Type a few characters; the checker runs once, after the last keystroke.
    let mut now = t0;
    for ch in ["a", "b", "c"] {
        now += Duration::from_millis(120);
        let len = view.document().len_chars();
        view.edit(&ChangeSet::insert(len, len, ch).unwrap(), now)
            .unwrap();
    }

    while let Some(wake) = view.lint().and_then(|s| s.next_wakeup()) {
        match view.poll(wake).unwrap() {
            PollOutcome::Linted {
                request,
                diagnostics,
            } => {
                println!(
                    "lint run #{} at +{}ms: {} diagnostics",
                    request.get(),
                    (wake - t0).as_millis(),
                    diagnostics
                );
            }
            other => println!("poll at +{}ms: {:?}", (wake - t0).as_millis(), other),
        }
    }

    let Some(session) = view.lint() else {
        return;
    };
    let state = Arc::clone(session.state());
    println!("\npanel open: {}", state.panel_open());
    for marker in state.line_markers(view.document()) {
        println!(
            "  line {}: {} ({} diagnostics)",
            marker.line + 1,
            marker.severity,
            marker.diagnostics.len()
        );
    }

    let mut panel = DiagnosticPanel::new();
    for edit in panel.sync(&state, |entry| {
        format!("{}..{} {}", entry.from(), entry.to(), entry.diagnostic.message)
    }) {
        if let ListEdit::Insert { at, .. } = edit {
            println!("  row {}: {}", at, panel.items()[at].rendered);
        }
    }

    if let Some(tr) = panel.move_selection(&state, PanelMove::Next) {
        let len = view.document().len_chars();
        if let Some(session) = view.lint_mut() {
            session.dispatch(&tr, len);
            let selected = session.state().selected().map(|s| s.range());
            println!("\nselected after PanelMove::Next: {:?}", selected);
        }
    }

    println!("\nstate changes:");
    for line in changes.lock().unwrap().iter() {
        println!("  {line}");
    }
}
