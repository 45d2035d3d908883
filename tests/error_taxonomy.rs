use minesweeper_kb::core::board::Board;
use minesweeper_kb::core::cell::Cell;
use minesweeper_kb::knowledge::base::KnowledgeBase;
use minesweeper_kb::knowledge::statement::Statement;
use minesweeper_kb::knowledge::{InferenceError, InferenceLimits};

fn c(row: i32, col: i32) -> Cell {
    Cell::new(row, col)
}

fn stmt(cells: &[(i32, i32)], count: usize) -> Statement {
    Statement::new(cells.iter().map(|&p| Cell::from(p)), count).unwrap()
}

#[test]
fn reobserving_with_a_different_count_fails() {
    let mut kb = KnowledgeBase::new(Board::new(3, 3));
    kb.observe(c(1, 1), 2).unwrap();
    let err = kb.observe(c(1, 1), 3).unwrap_err();
    assert_eq!(
        err,
        InferenceError::InconsistentObservation {
            cell: c(1, 1),
            previous: 2,
            count: 3,
        }
    );
}

#[test]
fn observing_a_known_mine_fails() {
    let mut kb = KnowledgeBase::new(Board::new(1, 3));
    kb.observe(c(0, 0), 1).unwrap();
    let err = kb.observe(c(0, 1), 1).unwrap_err();
    assert_eq!(err, InferenceError::ObservedMine { cell: c(0, 1) });
}

#[test]
fn out_of_board_cells_are_rejected() {
    let mut kb = KnowledgeBase::new(Board::new(2, 3));
    assert!(matches!(
        kb.observe(c(2, 0), 0),
        Err(InferenceError::OutOfBounds { height: 2, width: 3, .. })
    ));
    assert!(kb.observe(c(0, 2), 0).is_ok());
    assert!(kb.add_statement(stmt(&[(0, 0), (5, 5)], 1)).is_err());
    assert!(kb.mark_mine(c(-1, 0)).is_err());
}

#[test]
fn count_larger_than_neighbourhood_fails() {
    let mut kb = KnowledgeBase::new(Board::new(1, 3));
    let err = kb.observe(c(0, 0), 2).unwrap_err();
    assert!(matches!(err, InferenceError::Contradiction { .. }));
}

#[test]
fn count_larger_than_unknown_neighbours_fails() {
    // Both neighbours of (0,1) are known safe, so it cannot show a mine.
    let mut kb = KnowledgeBase::new(Board::new(1, 3));
    kb.observe(c(0, 0), 0).unwrap();
    kb.mark_safe(c(0, 2)).unwrap();
    let err = kb.observe(c(0, 1), 1).unwrap_err();
    assert!(matches!(err, InferenceError::Contradiction { .. }));
}

#[test]
fn marking_a_cell_both_ways_is_a_conflict() {
    let mut kb = KnowledgeBase::new(Board::new(2, 2));
    kb.mark_mine(c(0, 0)).unwrap();
    assert_eq!(
        kb.mark_safe(c(0, 0)).unwrap_err(),
        InferenceError::Conflict { cell: c(0, 0) }
    );
}

#[test]
fn same_cells_with_different_counts_is_contradiction() {
    let mut kb = KnowledgeBase::new(Board::new(3, 3));
    kb.add_statement(stmt(&[(0, 0), (0, 1), (0, 2)], 1)).unwrap();
    let err = kb.add_statement(stmt(&[(0, 0), (0, 1), (0, 2)], 2)).unwrap_err();
    assert!(matches!(err, InferenceError::Contradiction { .. }));
}

#[test]
fn negative_resolution_surfaces_from_the_fixpoint() {
    let mut kb = KnowledgeBase::new(Board::new(1, 4));
    kb.add_statement(stmt(&[(0, 0), (0, 1), (0, 2)], 2)).unwrap();
    let err = kb
        .add_statement(stmt(&[(0, 0), (0, 1), (0, 2), (0, 3)], 1))
        .unwrap_err();
    assert!(matches!(err, InferenceError::NegativeResolution { .. }));
}

#[test]
fn mine_on_a_deduced_safe_cell_is_a_conflict() {
    let mut kb = KnowledgeBase::new(Board::new(1, 3));
    kb.add_statement(stmt(&[(0, 0), (0, 1), (0, 2)], 1)).unwrap();
    kb.mark_mine(c(0, 0)).unwrap();
    assert!(kb.known_safes().contains(&c(0, 1)));
    let err = kb.mark_mine(c(0, 2)).unwrap_err();
    assert_eq!(err, InferenceError::Conflict { cell: c(0, 2) });
}

#[test]
fn tiny_pass_limit_is_reported() {
    let limits = InferenceLimits {
        max_passes: 1,
        max_statements: 100,
    };
    let mut kb = KnowledgeBase::with_limits(Board::new(3, 3), limits);
    kb.observe(c(1, 1), 2).unwrap();
    // The second observation needs a resolution pass plus a confirming pass.
    let err = kb.observe(c(0, 1), 1).unwrap_err();
    assert!(matches!(
        err,
        InferenceError::StepLimitExceeded { metric: "passes", limit: 1, .. }
    ));
}

#[test]
fn tiny_statement_limit_is_reported() {
    let limits = InferenceLimits {
        max_passes: 100,
        max_statements: 1,
    };
    let mut kb = KnowledgeBase::with_limits(Board::new(3, 3), limits);
    kb.observe(c(1, 1), 2).unwrap();
    let err = kb.observe(c(0, 1), 1).unwrap_err();
    assert!(matches!(
        err,
        InferenceError::StepLimitExceeded { metric: "statements", .. }
    ));
}

#[test]
fn errors_render_readably() {
    let err = InferenceError::OutOfBounds {
        cell: c(4, 0),
        height: 3,
        width: 3,
    };
    assert_eq!(err.to_string(), "cell (4, 0) is outside the 3x3 board");
}
