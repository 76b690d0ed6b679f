use super::*;

const RED: StyleId = StyleId::new(2);
const BLUE: StyleId = StyleId::new(1);

fn highlighted() -> RunSequence {
    RunSequence::from_runs(vec![
        Run::plain(0, 3),
        Run::marked(3, 7, RED),
        Run::plain(7, 10),
    ])
    .unwrap()
}

#[test]
fn plain_sequence_covers_document() {
    assert_eq!(RunSequence::plain(10).runs(), &[Run::plain(0, 10)]);
    assert!(RunSequence::plain(0).is_empty());
    assert_eq!(RunSequence::plain(0).len(), 0);
}

#[test]
fn find_covering_run_uses_half_open_ranges() {
    let runs = highlighted();
    assert_eq!(runs.find_covering_run(0), Some(&Run::plain(0, 3)));
    assert_eq!(runs.find_covering_run(3), Some(&Run::marked(3, 7, RED)));
    assert_eq!(runs.find_covering_run(6), Some(&Run::marked(3, 7, RED)));
    assert_eq!(runs.find_covering_run(7), Some(&Run::plain(7, 10)));
    assert_eq!(runs.find_covering_run(10), None);
}

#[test]
fn enclosing_marked_run_requires_full_containment() {
    let runs = highlighted();
    let inside = Selection::new(4, 6);
    let exact = Selection::new(7, 3);
    let straddling = Selection::new(2, 5);

    assert_eq!(
        runs.find_enclosing_marked_run(&inside),
        Some(&Run::marked(3, 7, RED))
    );
    assert_eq!(
        runs.find_enclosing_marked_run(&exact),
        Some(&Run::marked(3, 7, RED))
    );
    assert_eq!(runs.find_enclosing_marked_run(&straddling), None);
    assert_eq!(runs.find_enclosing_marked_run(&Selection::new(8, 9)), None);
}

#[test]
fn enclosing_run_with_style_filters_by_style() {
    let runs = highlighted();
    let inside = Selection::new(4, 6);
    assert!(runs.find_enclosing_run_with_style(&inside, RED).is_some());
    assert!(runs.find_enclosing_run_with_style(&inside, BLUE).is_none());
}

#[test]
fn caret_at_run_end_is_inside_the_run() {
    let runs = highlighted();
    assert_eq!(
        runs.find_enclosing_marked_run(&Selection::caret(7)),
        Some(&Run::marked(3, 7, RED))
    );
    let trailing = RunSequence::from_runs(vec![Run::plain(0, 4), Run::marked(4, 6, BLUE)]).unwrap();
    assert_eq!(
        trailing.find_enclosing_marked_run(&Selection::caret(6)),
        Some(&Run::marked(4, 6, BLUE))
    );
}

#[test]
fn normalize_merges_and_drops_empties() {
    let runs = [
        Run::plain(0, 2),
        Run::marked(2, 2, RED),
        Run::plain(2, 5),
        Run::marked(5, 6, BLUE),
        Run::marked(6, 9, BLUE),
        Run::plain(9, 10),
    ];
    assert_eq!(
        normalize(&runs),
        vec![Run::plain(0, 5), Run::marked(5, 9, BLUE), Run::plain(9, 10)]
    );
}

#[test]
fn normalize_is_idempotent() {
    let samples: Vec<Vec<Run>> = vec![
        vec![],
        vec![Run::plain(0, 0)],
        vec![Run::plain(0, 1), Run::plain(1, 2), Run::plain(2, 3)],
        vec![
            Run::marked(0, 1, RED),
            Run::marked(1, 1, BLUE),
            Run::marked(1, 4, RED),
            Run::plain(4, 6),
            Run::marked(6, 7, BLUE),
        ],
    ];
    for runs in samples {
        let once = normalize(&runs);
        assert_eq!(normalize(&once), once, "normalize not idempotent for {runs:?}");
    }
}

#[test]
fn from_runs_reports_structural_defects() {
    let cases = [
        (
            vec![Run::plain(1, 4)],
            RunDefect::NotAtOrigin { start: 1 },
        ),
        (
            vec![Run::plain(0, 3), Run::marked(4, 6, RED)],
            RunDefect::Gap { at: 3 },
        ),
        (
            vec![Run::plain(0, 3), Run::marked(2, 6, RED)],
            RunDefect::Overlap { at: 2 },
        ),
        (
            vec![Run::plain(0, 3), Run::marked(3, 3, RED)],
            RunDefect::Empty { index: 1 },
        ),
        (
            vec![Run::marked(0, 3, RED), Run::marked(3, 5, RED)],
            RunDefect::UnmergedNeighbors { index: 0 },
        ),
        (
            vec![Run::plain(0, 3), Run::plain(3, 5)],
            RunDefect::UnmergedNeighbors { index: 0 },
        ),
    ];
    for (runs, defect) in cases {
        assert_eq!(
            RunSequence::from_runs(runs),
            Err(MarkerError::InvalidRunSequence(defect))
        );
    }
}

#[test]
fn normalized_repairs_only_mergeable_input() {
    let merged = RunSequence::normalized(&[Run::plain(0, 3), Run::plain(3, 5)]).unwrap();
    assert_eq!(merged.runs(), &[Run::plain(0, 5)]);

    let gap = RunSequence::normalized(&[Run::plain(0, 3), Run::marked(4, 5, RED)]);
    assert_eq!(gap, Err(MarkerError::InvalidRunSequence(RunDefect::Gap { at: 3 })));
}

#[test]
fn for_text_checks_coverage_length() {
    assert!(RunSequence::for_text(vec![Run::plain(0, 5)], 5).is_ok());
    assert_eq!(
        RunSequence::for_text(vec![Run::plain(0, 5)], 8),
        Err(MarkerError::InvalidRunSequence(RunDefect::LengthMismatch {
            expected: 8,
            actual: 5
        }))
    );
}

#[test]
fn overwrite_splits_runs_at_both_ends() {
    let runs = highlighted();
    assert_eq!(
        runs.overwrite(5, 9, Some(BLUE)),
        vec![
            Run::plain(0, 3),
            Run::marked(3, 5, RED),
            Run::marked(5, 9, BLUE),
            Run::plain(9, 10),
        ]
    );
    assert_eq!(
        runs.overwrite(0, 3, Some(RED)),
        vec![
            Run::marked(0, 3, RED),
            Run::marked(3, 7, RED),
            Run::plain(7, 10),
        ]
    );
}
