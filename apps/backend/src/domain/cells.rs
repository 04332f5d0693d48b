//! Cell indexing and mark sets for a 5x5 card.
//!
//! Cell index = row * 5 + col, rows and columns zero-indexed.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::domain::{DomainError, ValidationKind};

pub const GRID_SIZE: u8 = 5;
pub const CELL_COUNT: u8 = GRID_SIZE * GRID_SIZE;
/// Centre cell [2][2].
pub const FREE_CELL: u8 = 12;

const ALL_BITS: u32 = (1 << CELL_COUNT) - 1;

pub const fn index_of(row: u8, col: u8) -> u8 {
    row * GRID_SIZE + col
}

/// Validate a client-supplied cell index.
pub fn check_index(index: u8) -> Result<u8, DomainError> {
    if index < CELL_COUNT {
        Ok(index)
    } else {
        Err(DomainError::validation(
            ValidationKind::CellOutOfRange,
            format!("cell index {index} is outside 0..={}", CELL_COUNT - 1),
        ))
    }
}

/// Set of cell indices backed by a 25-bit mask.
///
/// Serialized as a sorted array of indices.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CellSet(u32);

impl CellSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn full() -> Self {
        Self(ALL_BITS)
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & ALL_BITS)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn single(index: u8) -> Self {
        Self::from_bits(1 << index)
    }

    pub const fn row(row: u8) -> Self {
        Self::from_bits(0b11111 << (row * GRID_SIZE))
    }

    pub const fn col(col: u8) -> Self {
        Self::from_bits(0b00001_00001_00001_00001_00001 << col)
    }

    /// Build from trusted indices (out-of-range indices are dropped).
    pub fn from_indices<I: IntoIterator<Item = u8>>(indices: I) -> Self {
        indices
            .into_iter()
            .filter(|i| *i < CELL_COUNT)
            .fold(Self::empty(), |set, i| set.with(i))
    }

    /// Build from untrusted indices, rejecting anything off the card.
    pub fn try_from_indices<I: IntoIterator<Item = u8>>(indices: I) -> Result<Self, DomainError> {
        let mut set = Self::empty();
        for index in indices {
            set.insert(check_index(index)?);
        }
        Ok(set)
    }

    #[must_use]
    pub const fn with(self, index: u8) -> Self {
        Self::from_bits(self.0 | (1 << index))
    }

    /// Insert, returning true if the set changed.
    pub fn insert(&mut self, index: u8) -> bool {
        let before = self.0;
        *self = self.with(index);
        before != self.0
    }

    /// Remove, returning true if the set changed.
    pub fn remove(&mut self, index: u8) -> bool {
        let before = self.0;
        self.0 &= !(1 << index);
        before != self.0
    }

    pub const fn contains(self, index: u8) -> bool {
        index < CELL_COUNT && self.0 & (1 << index) != 0
    }

    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// True iff every cell of `other` is in `self`.
    pub const fn covers(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn iter(self) -> impl Iterator<Item = u8> {
        (0..CELL_COUNT).filter(move |i| self.contains(*i))
    }

    pub fn to_vec(self) -> Vec<u8> {
        self.iter().collect()
    }
}

impl fmt::Debug for CellSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<u8> for CellSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        Self::from_indices(iter)
    }
}

impl Serialize for CellSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for CellSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let indices = Vec::<u8>::deserialize(deserializer)?;
        CellSet::try_from_indices(indices).map_err(D::Error::custom)
    }
}
