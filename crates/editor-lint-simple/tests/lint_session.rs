use editor_lint::{
    Anchor, ChangeSet, CommandStatus, EditorView, LintConfig, PollOutcome, Severity,
};
use editor_lint_simple::{RedeclarationLinter, RegexLinter};
use std::time::{Duration, Instant};

#[test]
fn test_redeclaration_linter_drives_session() {
    let t0 = Instant::now();
    let mut view = EditorView::new("let x = 1\nlet x = 2");
    view.attach_linting(
        RedeclarationLinter::new(Severity::Warning).unwrap(),
        LintConfig::default(),
        t0,
    );

    let outcome = view.poll(t0 + Duration::from_millis(500)).unwrap();
    assert!(matches!(outcome, PollOutcome::Linted { diagnostics: 1, .. }));
    let entry = view.lint().unwrap().state().anchors().first().unwrap();
    assert_eq!(entry.anchor, Anchor::Span { from: 14, to: 15 });

    // Indenting the line moves the warning along.
    let len = view.document().len_chars();
    view.edit(&ChangeSet::insert(len, 10, "    ").unwrap(), t0 + Duration::from_millis(600))
        .unwrap();
    let entry = view.lint().unwrap().state().anchors().first().unwrap();
    assert_eq!(entry.anchor, Anchor::Span { from: 18, to: 19 });

    // Replacing the name deletes the anchored text; the next run agrees.
    let len = view.document().len_chars();
    view.edit(&ChangeSet::replace(len, 18, 19, "y").unwrap(), t0 + Duration::from_millis(700))
        .unwrap();
    assert_eq!(view.lint().unwrap().state().diagnostic_count(), 0);
    let outcome = view.poll(t0 + Duration::from_millis(1200)).unwrap();
    assert!(matches!(outcome, PollOutcome::Linted { diagnostics: 0, .. }));
}

#[test]
fn test_regex_linter_with_min_severity() {
    let config = LintConfig {
        min_severity: Some(Severity::Warning),
        auto_panel: true,
        ..LintConfig::default()
    };
    let mut view = EditorView::new("a  \n// TODO\nb");
    view.attach_linting(RegexLinter::text_default().unwrap(), config, Instant::now());
    assert_eq!(view.force_linting().unwrap(), CommandStatus::Applied);

    let state = view.lint().unwrap().state();
    assert_eq!(state.diagnostic_count(), 1);
    assert_eq!(state.count_by_severity(Severity::Warning), 1);
    assert!(state.panel_open());
}
