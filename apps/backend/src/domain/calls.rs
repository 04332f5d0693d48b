//! Call history and the value pools callers draw from.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, ValidationKind};

/// Column letters for the numbers game, 15 values each.
pub const COLUMN_LETTERS: [char; 5] = ['B', 'I', 'N', 'G', 'O'];
pub const NUMBERS_PER_COLUMN: u8 = 15;

pub const WORD_POOL: [&str; 25] = [
    "Grace", "Faith", "Hope", "Love", "Joy", "Peace", "Mercy", "Trust", "Strength", "Wisdom",
    "Courage", "Prayer", "Blessing", "Light", "Spirit", "Heart", "Soul", "Truth", "Life",
    "Praise", "Glory", "Heaven", "Angels", "Miracle", "Goodness",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    Numbers,
    Words,
}

impl GameType {
    pub const fn as_str(self) -> &'static str {
        match self {
            GameType::Numbers => "numbers",
            GameType::Words => "words",
        }
    }

    /// Every value a caller may emit, in canonical order.
    pub fn pool(self) -> Vec<String> {
        match self {
            GameType::Numbers => (1..=75).filter_map(number_label).collect(),
            GameType::Words => WORD_POOL.iter().map(|w| (*w).to_string()).collect(),
        }
    }

    pub fn pool_size(self) -> usize {
        match self {
            GameType::Numbers => 75,
            GameType::Words => WORD_POOL.len(),
        }
    }

    pub fn in_pool(self, value: &str) -> bool {
        match self {
            GameType::Numbers => parse_number_label(value).is_some(),
            GameType::Words => WORD_POOL.contains(&value),
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "numbers" => Ok(GameType::Numbers),
            "words" => Ok(GameType::Words),
            other => Err(DomainError::validation(
                ValidationKind::UnknownGameType,
                format!("unknown game type '{other}'"),
            )),
        }
    }
}

/// "B1".."O75": the column letter followed by the number.
pub fn number_label(n: u8) -> Option<String> {
    if !(1..=75).contains(&n) {
        return None;
    }
    let column = COLUMN_LETTERS[usize::from((n - 1) / NUMBERS_PER_COLUMN)];
    Some(format!("{column}{n}"))
}

/// Inverse of [`number_label`]; rejects mismatched letters such as "B20".
pub fn parse_number_label(label: &str) -> Option<u8> {
    let mut chars = label.chars();
    chars.next()?;
    let n: u8 = chars.as_str().parse().ok()?;
    number_label(n).filter(|expected| expected == label).map(|_| n)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalledValue {
    pub seq: u32,
    pub value: String,
    #[serde(with = "time::serde::rfc3339")]
    pub called_at: OffsetDateTime,
}

/// Append-only, strictly increasing call sequence for one room's current game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallHistory {
    calls: Vec<CalledValue>,
    values: HashSet<String>,
}

impl CallHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from stored rows; rows must already be ordered by sequence.
    pub fn from_calls(calls: Vec<CalledValue>) -> Result<Self, DomainError> {
        let mut history = Self::new();
        for call in calls {
            if history.last().is_some_and(|last| call.seq <= last.seq)
                || history.contains(&call.value)
            {
                return Err(DomainError::infra(
                    InfraErrorKind::DataCorruption,
                    format!("call history out of order or duplicated at seq {}", call.seq),
                ));
            }
            history.values.insert(call.value.clone());
            history.calls.push(call);
        }
        Ok(history)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(value)
    }

    pub fn get(&self, value: &str) -> Option<&CalledValue> {
        self.calls.iter().find(|c| c.value == value)
    }

    pub fn calls(&self) -> &[CalledValue] {
        &self.calls
    }

    pub fn last(&self) -> Option<&CalledValue> {
        self.calls.last()
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn next_seq(&self) -> u32 {
        self.last().map_or(1, |c| c.seq + 1)
    }

    pub fn first_called_at(&self) -> Option<OffsetDateTime> {
        self.calls.first().map(|c| c.called_at)
    }

    /// Append a new value. Duplicates are rejected; callers decide whether a
    /// duplicate is an idempotent retry.
    pub fn append(&mut self, value: String, at: OffsetDateTime) -> Result<&CalledValue, DomainError> {
        if self.contains(&value) {
            return Err(DomainError::conflict(
                ConflictKind::DuplicateCall,
                format!("'{value}' has already been called"),
            ));
        }
        let seq = self.next_seq();
        self.values.insert(value.clone());
        self.calls.push(CalledValue {
            seq,
            value,
            called_at: at,
        });
        Ok(&self.calls[self.calls.len() - 1])
    }
}

/// Pool values not yet called, in canonical pool order.
pub fn remaining_values(game_type: GameType, history: &CallHistory) -> Vec<String> {
    game_type
        .pool()
        .into_iter()
        .filter(|v| !history.contains(v))
        .collect()
}

/// Draw the next value deterministically from `seed`; `None` once the pool is exhausted.
pub fn pick_next(game_type: GameType, history: &CallHistory, seed: u64) -> Option<String> {
    let remaining = remaining_values(game_type, history);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    remaining.choose(&mut rng).cloned()
}
