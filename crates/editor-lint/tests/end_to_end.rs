use editor_lint::{
    Anchor, ChangeSet, CommandStatus, Diagnostic, DiagnosticRange, Document, EditorView,
    LintConfig, PollOutcome, Severity, source_fn,
};
use std::convert::Infallible;
use std::time::{Duration, Instant};

fn redeclaration_source(
    _: &Document,
) -> Result<Vec<Diagnostic>, Infallible> {
    Ok(vec![
        Diagnostic::new(DiagnosticRange::new(15, 16), Severity::Warning, "redeclared x")
            .with_source("stub"),
    ])
}

#[test]
fn test_redeclaration_warning_is_anchored_and_follows_edits() {
    let t0 = Instant::now();
    let mut view = EditorView::new("let x = 1\nlet x = 2");
    view.attach_linting(
        source_fn(redeclaration_source),
        LintConfig::default(),
        t0,
    );

    // Nothing happens before the quiet period elapses.
    assert!(matches!(
        view.poll(t0 + Duration::from_millis(200)).unwrap(),
        PollOutcome::Pending(_)
    ));
    assert_eq!(view.lint().unwrap().state().diagnostic_count(), 0);

    let outcome = view.poll(t0 + Duration::from_millis(500)).unwrap();
    assert!(matches!(outcome, PollOutcome::Linted { diagnostics: 1, .. }));

    let state = view.lint().unwrap().state();
    let entry = state.anchors().first().unwrap();
    assert_eq!(entry.anchor, Anchor::Span { from: 15, to: 16 });
    assert_eq!(entry.severity(), Severity::Warning);
    let diagnostic = entry.diagnostic.clone();

    assert_eq!(view.next_diagnostic(), CommandStatus::Applied);
    assert_eq!(view.cursor(), 15..16);

    let len = view.document().len_chars();
    view.edit(&ChangeSet::insert(len, 0, "\n").unwrap(), t0 + Duration::from_millis(600))
        .unwrap();

    let state = view.lint().unwrap().state();
    let entry = state.anchors().first().unwrap();
    assert_eq!(entry.anchor, Anchor::Span { from: 16, to: 17 });
    let selected = state.selected().unwrap();
    assert_eq!((selected.from, selected.to), (16, 17));
    assert!(selected.diagnostic.same(&diagnostic));
    assert_eq!(view.cursor(), 16..17);
}

#[test]
fn test_linting_can_be_detached() {
    let t0 = Instant::now();
    let mut view = EditorView::new("let x = 1\nlet x = 2");
    view.attach_linting(source_fn(redeclaration_source), LintConfig::default(), t0);
    assert_eq!(view.force_linting().unwrap(), CommandStatus::Applied);
    assert_eq!(view.lint().unwrap().state().diagnostic_count(), 1);

    let session = view.detach_linting().unwrap();
    assert_eq!(session.state().diagnostic_count(), 1);
    assert!(view.lint().is_none());
    assert_eq!(view.open_panel(), CommandStatus::NotApplicable);
    assert_eq!(view.close_panel(), CommandStatus::NotApplicable);
    assert_eq!(view.force_linting().unwrap(), CommandStatus::NotApplicable);
    assert_eq!(view.poll(t0 + Duration::from_secs(1)).unwrap(), PollOutcome::Idle);
}
