//! One player's 5x5 card: a frozen layout plus a mutable mark set.

use serde::{Deserialize, Serialize};

use super::calls::CallHistory;
use super::cells::{check_index, CellSet, CELL_COUNT, FREE_CELL};
use super::patterns::Pattern;
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cell {
    Value { label: String },
    Free,
}

impl Cell {
    pub fn value(label: impl Into<String>) -> Self {
        Cell::Value {
            label: label.into(),
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Cell::Value { label } => Some(label),
            Cell::Free => None,
        }
    }
}

/// Immutable 25-cell layout with exactly one free cell at the centre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Cell>", into = "Vec<Cell>")]
pub struct CardLayout {
    cells: Vec<Cell>,
}

impl CardLayout {
    pub fn new(cells: Vec<Cell>) -> Result<Self, DomainError> {
        if cells.len() != CELL_COUNT as usize {
            return Err(DomainError::validation(
                ValidationKind::InvalidLayout,
                format!("layout must have {CELL_COUNT} cells, got {}", cells.len()),
            ));
        }
        let free: Vec<usize> = cells
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, Cell::Free))
            .map(|(i, _)| i)
            .collect();
        if free != [FREE_CELL as usize] {
            return Err(DomainError::validation(
                ValidationKind::InvalidLayout,
                format!("layout must have exactly one free cell at index {FREE_CELL}, found {free:?}"),
            ));
        }
        let mut labels: Vec<&str> = cells.iter().filter_map(Cell::label).collect();
        labels.sort_unstable();
        if labels.windows(2).any(|w| w[0] == w[1]) {
            return Err(DomainError::validation(
                ValidationKind::InvalidLayout,
                "layout labels must be unique",
            ));
        }
        Ok(Self { cells })
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, index: u8) -> Option<&Cell> {
        self.cells.get(index as usize)
    }

    pub fn position_of(&self, value: &str) -> Option<u8> {
        self.cells
            .iter()
            .position(|c| c.label() == Some(value))
            .and_then(|i| u8::try_from(i).ok())
    }

    /// Cells whose value has been called, plus the free cell.
    pub fn called_cells(&self, history: &CallHistory) -> CellSet {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| match cell {
                Cell::Free => true,
                Cell::Value { label } => history.contains(label),
            })
            .filter_map(|(i, _)| u8::try_from(i).ok())
            .collect()
    }
}

impl TryFrom<Vec<Cell>> for CardLayout {
    type Error = DomainError;

    fn try_from(cells: Vec<Cell>) -> Result<Self, Self::Error> {
        CardLayout::new(cells)
    }
}

impl From<CardLayout> for Vec<Cell> {
    fn from(layout: CardLayout) -> Self {
        layout.cells
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: i64,
    pub player_id: i64,
    layout: CardLayout,
    marks: CellSet,
}

impl Card {
    /// The free cell is folded into the mark set on construction.
    pub fn new(id: i64, player_id: i64, layout: CardLayout, marks: CellSet) -> Self {
        Self {
            id,
            player_id,
            layout,
            marks: marks.with(FREE_CELL),
        }
    }

    pub fn layout(&self) -> &CardLayout {
        &self.layout
    }

    /// Stored marks, free cell included.
    pub fn marks(&self) -> CellSet {
        self.marks
    }

    /// Returns true if the mark set changed. Marking the free cell is a no-op.
    pub fn mark(&mut self, index: u8) -> Result<bool, DomainError> {
        let index = check_index(index)?;
        Ok(self.marks.insert(index))
    }

    /// Returns true if the mark set changed.
    pub fn unmark(&mut self, index: u8) -> Result<bool, DomainError> {
        let index = check_index(index)?;
        if index == FREE_CELL {
            return Err(DomainError::validation(
                ValidationKind::FreeCellImmutable,
                "the free cell is always marked",
            ));
        }
        Ok(self.marks.remove(index))
    }

    /// A mark is valid if the cell is free or its value has been called.
    pub fn is_valid_mark(&self, index: u8, history: &CallHistory) -> Result<bool, DomainError> {
        let index = check_index(index)?;
        Ok(self.layout.called_cells(history).contains(index))
    }

    /// Stored marks restricted to cells backed by the call history.
    pub fn snapshot_marks(&self, history: &CallHistory) -> CellSet {
        self.marks.intersection(self.layout.called_cells(history))
    }

    pub fn satisfies(&self, pattern: Pattern, history: &CallHistory) -> bool {
        pattern.is_satisfied(self.snapshot_marks(history))
    }
}
