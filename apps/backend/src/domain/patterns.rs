//! Win patterns: which cells they cover and when a mark set satisfies them.
//!
//! Every check treats the free cell as marked.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::cells::{index_of, CellSet, FREE_CELL, GRID_SIZE};
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    /// Any full row, column or main diagonal.
    Straight,
    Diagonal,
    FourCorners,
    /// Any 2x2 block.
    BlockOfFour,
    /// Any four covered cells.
    AnyFour,
    LetterH,
    LetterE,
    LetterL,
    LetterI,
    OutsideEdge,
    Coverall,
}

const MAIN_DIAGONAL: CellSet = CellSet::from_bits(
    1 << index_of(0, 0) | 1 << index_of(1, 1) | 1 << index_of(2, 2) | 1 << index_of(3, 3) | 1 << index_of(4, 4),
);
const ANTI_DIAGONAL: CellSet = CellSet::from_bits(
    1 << index_of(0, 4) | 1 << index_of(1, 3) | 1 << index_of(2, 2) | 1 << index_of(3, 1) | 1 << index_of(4, 0),
);
const CORNERS: CellSet = CellSet::from_bits(
    1 << index_of(0, 0) | 1 << index_of(0, 4) | 1 << index_of(4, 0) | 1 << index_of(4, 4),
);

fn letter_h() -> CellSet {
    CellSet::col(0).union(CellSet::col(4)).union(CellSet::row(2))
}

fn letter_e() -> CellSet {
    CellSet::row(0)
        .union(CellSet::row(2))
        .union(CellSet::row(4))
        .union(CellSet::col(0))
}

fn letter_l() -> CellSet {
    CellSet::col(0).union(CellSet::row(4))
}

fn letter_i() -> CellSet {
    CellSet::row(0).union(CellSet::row(4)).union(CellSet::col(2))
}

fn outside_edge() -> CellSet {
    CellSet::row(0)
        .union(CellSet::row(4))
        .union(CellSet::col(0))
        .union(CellSet::col(4))
}

/// Every row, every column and both diagonals.
fn straight_lines() -> impl Iterator<Item = CellSet> {
    (0..GRID_SIZE)
        .map(CellSet::row)
        .chain((0..GRID_SIZE).map(CellSet::col))
        .chain([MAIN_DIAGONAL, ANTI_DIAGONAL])
}

/// The 16 possible 2x2 blocks, keyed by their top-left cell.
fn blocks_of_four() -> impl Iterator<Item = CellSet> {
    (0..GRID_SIZE - 1).flat_map(|row| {
        (0..GRID_SIZE - 1).map(move |col| {
            let top_left = index_of(row, col);
            CellSet::from_indices([
                top_left,
                top_left + 1,
                top_left + GRID_SIZE,
                top_left + GRID_SIZE + 1,
            ])
        })
    })
}

impl Pattern {
    pub const ALL: [Pattern; 11] = [
        Pattern::Straight,
        Pattern::Diagonal,
        Pattern::FourCorners,
        Pattern::BlockOfFour,
        Pattern::AnyFour,
        Pattern::LetterH,
        Pattern::LetterE,
        Pattern::LetterL,
        Pattern::LetterI,
        Pattern::OutsideEdge,
        Pattern::Coverall,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Pattern::Straight => "straight",
            Pattern::Diagonal => "diagonal",
            Pattern::FourCorners => "four_corners",
            Pattern::BlockOfFour => "block_of_four",
            Pattern::AnyFour => "any_four",
            Pattern::LetterH => "letter_h",
            Pattern::LetterE => "letter_e",
            Pattern::LetterL => "letter_l",
            Pattern::LetterI => "letter_i",
            Pattern::OutsideEdge => "outside_edge",
            Pattern::Coverall => "coverall",
        }
    }

    /// Cells visually associated with the pattern.
    ///
    /// Dynamic patterns (straight, block of four, any four) return the whole
    /// card because the winning subset is not fixed in advance.
    pub fn cells(self) -> CellSet {
        match self {
            Pattern::Straight | Pattern::BlockOfFour | Pattern::AnyFour | Pattern::Coverall => {
                CellSet::full()
            }
            Pattern::Diagonal => MAIN_DIAGONAL.union(ANTI_DIAGONAL),
            Pattern::FourCorners => CORNERS,
            Pattern::LetterH => letter_h(),
            Pattern::LetterE => letter_e(),
            Pattern::LetterL => letter_l(),
            Pattern::LetterI => letter_i(),
            Pattern::OutsideEdge => outside_edge(),
        }
    }

    /// True iff some instance of the pattern is fully covered by
    /// `marked` plus the free cell.
    pub fn is_satisfied(self, marked: CellSet) -> bool {
        self.winning_cells(marked).is_some()
    }

    /// The first covered instance of the pattern, if any.
    pub fn winning_cells(self, marked: CellSet) -> Option<CellSet> {
        let covered = marked.with(FREE_CELL);
        match self {
            Pattern::Straight => straight_lines().find(|line| covered.covers(*line)),
            Pattern::Diagonal => [MAIN_DIAGONAL, ANTI_DIAGONAL]
                .into_iter()
                .find(|line| covered.covers(*line)),
            Pattern::BlockOfFour => blocks_of_four().find(|block| covered.covers(*block)),
            Pattern::AnyFour => (covered.len() >= 4).then_some(covered),
            Pattern::FourCorners
            | Pattern::LetterH
            | Pattern::LetterE
            | Pattern::LetterL
            | Pattern::LetterI
            | Pattern::OutsideEdge
            | Pattern::Coverall => {
                let group = self.cells();
                covered.covers(group).then_some(group)
            }
        }
    }

    /// Prize for winning this pattern as the room's single pattern.
    pub const fn default_prize(self) -> i64 {
        match self {
            Pattern::Straight | Pattern::Diagonal => 100,
            Pattern::FourCorners => 125,
            Pattern::BlockOfFour => 150,
            Pattern::AnyFour
            | Pattern::LetterH
            | Pattern::LetterE
            | Pattern::LetterL
            | Pattern::LetterI
            | Pattern::OutsideEdge
            | Pattern::Coverall => 350,
        }
    }

    /// Prize for this pattern as a progressive stage; straight pays more.
    pub const fn progressive_prize(self) -> i64 {
        match self {
            Pattern::Straight => 150,
            other => other.default_prize(),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pattern {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Pattern::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| {
                DomainError::validation(
                    ValidationKind::UnknownPattern,
                    format!("unknown pattern '{needle}'"),
                )
            })
    }
}
