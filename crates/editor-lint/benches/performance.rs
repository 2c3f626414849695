use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use editor_lint::{
    ChangeSet, Diagnostic, DiagnosticRange, DiagnosticRef, ItemIds, LintState, RangeAnchorSet,
    Severity, Transaction, reconcile, reduce,
};
use std::sync::Arc;

const DOC_LEN: usize = 500_000;

fn diagnostics(count: usize) -> Vec<DiagnosticRef> {
    let step = DOC_LEN / count;
    (0..count)
        .map(|i| {
            let start = i * step;
            let severity = match i % 3 {
                0 => Severity::Error,
                1 => Severity::Warning,
                _ => Severity::Info,
            };
            Diagnostic::new(DiagnosticRange::new(start, start + 7), severity, "bench").into()
        })
        .collect()
}

fn bench_anchor_remap(c: &mut Criterion) {
    let set = RangeAnchorSet::from_diagnostics(diagnostics(10_000), DOC_LEN);
    let change = ChangeSet::insert(DOC_LEN, DOC_LEN / 2, "x").unwrap();

    c.bench_function("anchors_remap/10k_single_insert", |b| {
        b.iter(|| black_box(set.remap(black_box(&change))).len())
    });
}

fn bench_typing_with_selection(c: &mut Criterion) {
    let initial = reduce(
        &Arc::new(LintState::default()),
        &Transaction::set_diagnostics(diagnostics(2_000)),
        DOC_LEN,
    );

    c.bench_function("reduce/100_keystrokes_2k_diagnostics", |b| {
        b.iter_batched(
            || Arc::clone(&initial),
            |mut state| {
                let mut len = DOC_LEN;
                let mut offset = DOC_LEN / 3;
                for _ in 0..100 {
                    let change = ChangeSet::insert(len, offset, "x").unwrap();
                    len += 1;
                    offset += 1;
                    state = reduce(&state, &Transaction::edit(change), len);
                }
                black_box(state.selected().map(|s| s.from));
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_reconcile_small_change(c: &mut Criterion) {
    let old = diagnostics(5_000);
    let mut new = old.clone();
    // Drop a few and add a few, as a typical re-lint would.
    new.drain(2_000..2_010);
    new.extend(diagnostics(10));
    let old_set = RangeAnchorSet::from_diagnostics(old, DOC_LEN);
    let new_set = RangeAnchorSet::from_diagnostics(new, DOC_LEN);

    c.bench_function("reconcile/5k_items_20_changes", |b| {
        b.iter_batched(
            || {
                let mut ids = ItemIds::new();
                let list = reconcile(Vec::new(), &old_set, None, &mut ids, |_| ()).items;
                (list, ids)
            },
            |(list, mut ids)| {
                let out = reconcile(list, &new_set, None, &mut ids, |_| ());
                black_box(out.edits.len());
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_anchor_remap,
    bench_typing_with_selection,
    bench_reconcile_small_change
);
criterion_main!(benches);
