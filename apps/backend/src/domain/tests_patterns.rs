use crate::domain::cells::{index_of, CellSet, FREE_CELL};
use crate::domain::patterns::Pattern;
use crate::errors::domain::{DomainError, ValidationKind};

fn set(indices: &[u8]) -> CellSet {
    CellSet::from_indices(indices.iter().copied())
}

#[test]
fn four_corners_needs_all_four() {
    assert!(Pattern::FourCorners.is_satisfied(set(&[0, 4, 20, 24])));
    assert!(!Pattern::FourCorners.is_satisfied(set(&[0, 4, 20])));
    assert_eq!(Pattern::FourCorners.cells(), set(&[0, 4, 20, 24]));
}

#[test]
fn column_zero_rows_zero_to_three_is_not_straight() {
    // Row 4 (cell 20) is missing; the free cell does not help column 0.
    let marks = set(&[0, 5, 10, 15]).with(FREE_CELL);
    assert!(!Pattern::Straight.is_satisfied(marks));
    assert!(Pattern::Straight.is_satisfied(marks.with(20)));
}

#[test]
fn straight_accepts_rows_columns_and_diagonals() {
    for row in 0..5 {
        assert!(Pattern::Straight.is_satisfied(CellSet::row(row)), "row {row}");
    }
    for col in 0..5 {
        assert!(Pattern::Straight.is_satisfied(CellSet::col(col)), "col {col}");
    }
    // Free cell completes both diagonals.
    assert!(Pattern::Straight.is_satisfied(set(&[0, 6, 18, 24])));
    assert!(Pattern::Straight.is_satisfied(set(&[4, 8, 16, 20])));
}

#[test]
fn row_two_uses_the_free_cell() {
    assert!(Pattern::Straight.is_satisfied(set(&[10, 11, 13, 14])));
}

#[test]
fn diagonal_ignores_rows() {
    assert!(!Pattern::Diagonal.is_satisfied(CellSet::row(0)));
    assert!(Pattern::Diagonal.is_satisfied(set(&[0, 6, 18, 24])));
}

#[test]
fn block_of_four_finds_any_two_by_two() {
    assert!(Pattern::BlockOfFour.is_satisfied(set(&[18, 19, 23, 24])));
    // Free cell counts towards a block.
    assert!(Pattern::BlockOfFour.is_satisfied(set(&[6, 7, 11])));
    assert!(!Pattern::BlockOfFour.is_satisfied(set(&[0, 1, 2, 3])));
}

#[test]
fn any_four_counts_the_free_cell() {
    assert!(Pattern::AnyFour.is_satisfied(set(&[0, 9, 24])));
    assert!(!Pattern::AnyFour.is_satisfied(set(&[0, 9])));
}

#[test]
fn coverall_requires_every_cell() {
    let almost = CellSet::full().difference(CellSet::single(index_of(4, 4)));
    assert!(!Pattern::Coverall.is_satisfied(almost));
    assert!(Pattern::Coverall.is_satisfied(CellSet::full().difference(CellSet::single(FREE_CELL))));
}

#[test]
fn letter_shapes_are_unions_of_rows_and_columns() {
    let h = CellSet::col(0).union(CellSet::col(4)).union(CellSet::row(2));
    assert_eq!(Pattern::LetterH.cells(), h);
    assert!(Pattern::LetterH.is_satisfied(h.difference(CellSet::single(FREE_CELL))));

    let l = CellSet::col(0).union(CellSet::row(4));
    assert_eq!(Pattern::LetterL.cells(), l);
    assert!(!Pattern::LetterL.is_satisfied(CellSet::col(0)));

    let edge = Pattern::OutsideEdge.cells();
    assert_eq!(edge.len(), 16);
    assert!(!edge.contains(FREE_CELL));
}

#[test]
fn dynamic_patterns_highlight_the_whole_card() {
    for p in [Pattern::Straight, Pattern::BlockOfFour, Pattern::AnyFour] {
        assert_eq!(p.cells(), CellSet::full(), "{p}");
    }
}

#[test]
fn default_prizes() {
    assert_eq!(Pattern::FourCorners.default_prize(), 125);
    assert_eq!(Pattern::Straight.default_prize(), 100);
    assert_eq!(Pattern::Straight.progressive_prize(), 150);
    assert_eq!(Pattern::Coverall.progressive_prize(), 350);
}

#[test]
fn parse_is_case_insensitive_and_rejects_unknown() {
    assert_eq!("FOUR_CORNERS".parse::<Pattern>().unwrap(), Pattern::FourCorners);
    for p in Pattern::ALL {
        assert_eq!(p.as_str().parse::<Pattern>().unwrap(), p);
    }
    let err = "zigzag".parse::<Pattern>().unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::UnknownPattern, _)));
}
