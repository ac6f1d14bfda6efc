mod common;

use common::init_logger;
use common::speckle::{copy_cell, shift_mask, speckle_mask};
use retina_match::compare::partition;
use retina_match::{Comparator, CompareParams, MatchError};

#[test]
fn vote_boundary_is_inclusive_at_three() {
    init_logger();
    let a = speckle_mask(128, 128, 1);
    let cells = partition(128, 128, 4);
    for (kept, expected) in [(2usize, false), (3, true)] {
        let mut b = speckle_mask(128, 128, 2);
        for cell in cells.iter().step_by(5).take(kept) {
            copy_cell(&a, &mut b, cell);
        }
        let report = Comparator::default().compare(&a, &b).unwrap();
        assert_eq!(report.votes, kept);
        assert_eq!(report.matched, expected);
    }
}

#[test]
fn unrelated_masks_do_not_match() {
    init_logger();
    let a = speckle_mask(128, 128, 40);
    let b = speckle_mask(128, 128, 41);
    let report = Comparator::default().compare(&a, &b).unwrap();
    assert!(!report.matched);
    let best = report.best_cell().unwrap();
    assert!(best.score < 0.45, "best={:?}", best);
}

#[test]
fn translated_mask_is_found() {
    init_logger();
    let a = speckle_mask(128, 128, 7);
    let b = shift_mask(&a, 3, 2, &speckle_mask(128, 128, 8));
    let report = Comparator::default().compare(&a, &b).unwrap();
    assert!(report.matched);
    let first = &report.cells[0];
    assert!(first.matched);
    assert_eq!(first.location, Some((3, 2)));
}

#[test]
fn stricter_vote_count_changes_the_decision() {
    init_logger();
    let a = speckle_mask(96, 96, 3);
    let mut b = speckle_mask(96, 96, 4);
    for cell in partition(96, 96, 4).iter().take(4) {
        copy_cell(&a, &mut b, cell);
    }
    let lenient = Comparator::default();
    let strict = Comparator::new(CompareParams {
        votes_required: 5,
        ..Default::default()
    });
    assert!(lenient.matches(&a, &b).unwrap());
    assert!(!strict.matches(&a, &b).unwrap());
}

#[test]
fn half_width_mask_is_a_dimension_mismatch() {
    init_logger();
    let a = speckle_mask(128, 128, 1);
    let b = speckle_mask(64, 128, 1);
    let err = retina_match::matches(&a, &b).unwrap_err();
    match err {
        MatchError::DimensionMismatch { left, right, splits } => {
            assert_eq!(left, (128, 128));
            assert_eq!(right, (64, 128));
            assert_eq!(splits, 4);
        }
        other => panic!("unexpected error {other}"),
    }
}
