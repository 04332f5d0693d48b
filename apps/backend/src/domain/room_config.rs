//! Host-supplied room configuration: game type, win mode and prize.

use serde::{Deserialize, Serialize};

use super::calls::GameType;
use super::patterns::Pattern;
use super::progressive::{validate_selection, ProgressiveState};
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum WinMode {
    Single { pattern: Pattern },
    Progressive { stages: Vec<Pattern> },
}

impl WinMode {
    /// Parse the loose wire shape: a mode name plus either a pattern or a
    /// stage list.
    pub fn parse(
        mode: &str,
        pattern: Option<&str>,
        stages: Option<&[String]>,
    ) -> Result<Self, DomainError> {
        match mode.trim().to_ascii_lowercase().as_str() {
            "single" => {
                let pattern = pattern.ok_or_else(|| {
                    DomainError::validation(
                        ValidationKind::UnknownPattern,
                        "single mode requires a pattern",
                    )
                })?;
                Ok(WinMode::Single {
                    pattern: pattern.parse()?,
                })
            }
            "progressive" => {
                let stages = stages
                    .unwrap_or_default()
                    .iter()
                    .map(|s| s.parse())
                    .collect::<Result<Vec<Pattern>, _>>()?;
                validate_selection(&stages)?;
                Ok(WinMode::Progressive { stages })
            }
            other => Err(DomainError::validation_other(format!(
                "unknown win mode '{other}'"
            ))),
        }
    }

    pub fn single_pattern(&self) -> Option<Pattern> {
        match self {
            WinMode::Single { pattern } => Some(*pattern),
            WinMode::Progressive { .. } => None,
        }
    }

    pub fn is_progressive(&self) -> bool {
        matches!(self, WinMode::Progressive { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomConfig {
    pub game_type: GameType,
    pub win_mode: WinMode,
    pub prize_override: Option<i64>,
}

impl RoomConfig {
    pub fn new(
        game_type: GameType,
        win_mode: WinMode,
        prize_override: Option<i64>,
    ) -> Result<Self, DomainError> {
        if let Some(prize) = prize_override {
            if prize <= 0 {
                return Err(DomainError::validation(
                    ValidationKind::InvalidPrize,
                    format!("prize must be positive, got {prize}"),
                ));
            }
            if win_mode.is_progressive() {
                return Err(DomainError::validation(
                    ValidationKind::InvalidPrize,
                    "progressive stages use fixed per-stage prizes",
                ));
            }
        }
        if let WinMode::Progressive { stages } = &win_mode {
            validate_selection(stages)?;
        }
        Ok(Self {
            game_type,
            win_mode,
            prize_override,
        })
    }

    /// Prize for the room: the override or pattern default in single mode,
    /// the sum of stage prizes in progressive mode.
    pub fn prize_value(&self) -> i64 {
        match &self.win_mode {
            WinMode::Single { pattern } => self.prize_override.unwrap_or(pattern.default_prize()),
            WinMode::Progressive { stages } => stages.iter().map(|p| p.progressive_prize()).sum(),
        }
    }

    /// Fresh progressive stages, if the mode calls for them.
    pub fn initial_stages(&self) -> Result<Option<ProgressiveState>, DomainError> {
        match &self.win_mode {
            WinMode::Single { .. } => Ok(None),
            WinMode::Progressive { stages } => ProgressiveState::from_selection(stages).map(Some),
        }
    }
}
