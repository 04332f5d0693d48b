//! Deterministic card layout generation.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use super::calls::{number_label, GameType, NUMBERS_PER_COLUMN, WORD_POOL};
use super::card::{CardLayout, Cell};
use super::cells::{index_of, FREE_CELL, GRID_SIZE};
use crate::errors::domain::DomainError;

/// Deal one layout for `game_type` from `seed`.
///
/// Numbers: column c holds five distinct values from its 15-number range
/// (four for the N column, whose centre is free). Words: 24 distinct words
/// from the pool around the free centre.
pub fn deal_layout(game_type: GameType, seed: u64) -> Result<CardLayout, DomainError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut cells = vec![Cell::Free; usize::from(GRID_SIZE * GRID_SIZE)];

    match game_type {
        GameType::Numbers => {
            for col in 0..GRID_SIZE {
                let low = col * NUMBERS_PER_COLUMN + 1;
                let mut column: Vec<u8> = (low..low + NUMBERS_PER_COLUMN).collect();
                column.shuffle(&mut rng);
                let mut drawn = column.into_iter();
                for row in 0..GRID_SIZE {
                    let index = index_of(row, col);
                    if index == FREE_CELL {
                        continue;
                    }
                    if let Some(label) = drawn.next().and_then(number_label) {
                        cells[usize::from(index)] = Cell::value(label);
                    }
                }
            }
        }
        GameType::Words => {
            let mut words: Vec<&str> = WORD_POOL.to_vec();
            words.shuffle(&mut rng);
            let mut drawn = words.into_iter();
            for index in (0..GRID_SIZE * GRID_SIZE).filter(|i| *i != FREE_CELL) {
                if let Some(word) = drawn.next() {
                    cells[usize::from(index)] = Cell::value(word);
                }
            }
        }
    }

    CardLayout::new(cells)
}
