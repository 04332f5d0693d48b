//! Progressive mode: an ordered list of 2-4 stages, each won once.

use std::collections::HashSet;

use serde::Serialize;
use time::OffsetDateTime;

use super::cells::CellSet;
use super::patterns::Pattern;
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};

pub const MIN_STAGES: usize = 2;
pub const MAX_STAGES: usize = 4;

/// Stage selections must hold 2 to 4 distinct patterns.
pub fn validate_selection(patterns: &[Pattern]) -> Result<(), DomainError> {
    if !(MIN_STAGES..=MAX_STAGES).contains(&patterns.len()) {
        return Err(DomainError::validation(
            ValidationKind::InvalidProgressiveSelection,
            format!(
                "progressive mode needs {MIN_STAGES}-{MAX_STAGES} patterns, got {}",
                patterns.len()
            ),
        ));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = patterns.iter().find(|p| !seen.insert(**p)) {
        return Err(DomainError::validation(
            ValidationKind::InvalidProgressiveSelection,
            format!("pattern '{dup}' selected more than once"),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stage {
    pub position: u8,
    pub pattern: Pattern,
    pub prize: i64,
    pub claimed_by: Option<i64>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub claimed_at: Option<OffsetDateTime>,
}

impl Stage {
    pub fn is_claimed(&self) -> bool {
        self.claimed_by.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressiveState {
    stages: Vec<Stage>,
}

impl ProgressiveState {
    /// Fresh, unclaimed stages in selection order.
    pub fn from_selection(patterns: &[Pattern]) -> Result<Self, DomainError> {
        validate_selection(patterns)?;
        let stages = patterns
            .iter()
            .zip(0u8..)
            .map(|(pattern, position)| Stage {
                position,
                pattern: *pattern,
                prize: pattern.progressive_prize(),
                claimed_by: None,
                claimed_at: None,
            })
            .collect();
        Ok(Self { stages })
    }

    /// Rebuild from stored stages; sorted by position.
    pub fn from_stages(mut stages: Vec<Stage>) -> Self {
        stages.sort_by_key(|s| s.position);
        Self { stages }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn patterns(&self) -> Vec<Pattern> {
        self.stages.iter().map(|s| s.pattern).collect()
    }

    /// First unclaimed stage, in position order, satisfied by `marks`.
    ///
    /// Exactly one stage is consumed per claim even if the marks satisfy
    /// several.
    pub fn route_claim(&self, marks: CellSet) -> Result<&Stage, DomainError> {
        if let Some(stage) = self
            .stages
            .iter()
            .find(|s| !s.is_claimed() && s.pattern.is_satisfied(marks))
        {
            return Ok(stage);
        }
        if let Some(taken) = self
            .stages
            .iter()
            .find(|s| s.is_claimed() && s.pattern.is_satisfied(marks))
        {
            return Err(DomainError::conflict(
                ConflictKind::PatternAlreadyWon,
                format!("stage '{}' has already been won", taken.pattern),
            ));
        }
        Err(DomainError::validation(
            ValidationKind::NoWinningPattern,
            "marks satisfy none of the remaining stages",
        ))
    }

    /// Record a stage win. Claiming an already-claimed stage is a conflict.
    pub fn apply_claim(
        &mut self,
        position: u8,
        player_id: i64,
        at: OffsetDateTime,
    ) -> Result<&Stage, DomainError> {
        let stage = self
            .stages
            .iter_mut()
            .find(|s| s.position == position)
            .ok_or_else(|| {
                DomainError::validation(
                    ValidationKind::InvalidProgressiveSelection,
                    format!("no stage at position {position}"),
                )
            })?;
        if stage.is_claimed() {
            return Err(DomainError::conflict(
                ConflictKind::PatternAlreadyWon,
                format!("stage '{}' has already been won", stage.pattern),
            ));
        }
        stage.claimed_by = Some(player_id);
        stage.claimed_at = Some(at);
        Ok(stage)
    }

    pub fn is_complete(&self) -> bool {
        !self.stages.is_empty() && self.stages.iter().all(Stage::is_claimed)
    }

    pub fn remaining(&self) -> usize {
        self.stages.iter().filter(|s| !s.is_claimed()).count()
    }

    pub fn total_prize(&self) -> i64 {
        self.stages.iter().map(|s| s.prize).sum()
    }

    /// Same selection with every claim flag cleared.
    pub fn cleared(&self) -> Self {
        Self {
            stages: self
                .stages
                .iter()
                .map(|s| Stage {
                    claimed_by: None,
                    claimed_at: None,
                    ..s.clone()
                })
                .collect(),
        }
    }
}
