//! Claim validation, fairness windows and prize splitting.
//!
//! Everything here is pure: the services layer loads the current winner
//! records and the call history, asks these functions what to do, and
//! applies the result with conditional updates.

use time::{Duration, OffsetDateTime};

use super::calls::CallHistory;
use super::card::Card;
use super::cells::{CellSet, FREE_CELL};
use crate::errors::domain::{DomainError, ValidationKind};

/// Check that every asserted mark is backed by the call history.
///
/// Returns the validated mark set (free cell included). Offending cells are
/// listed in ascending order in the error detail.
pub fn validate_claim_marks(
    card: &Card,
    asserted: CellSet,
    history: &CallHistory,
) -> Result<CellSet, DomainError> {
    let callable = card.layout().called_cells(history).with(FREE_CELL);
    let offending = asserted.difference(callable);
    if !offending.is_empty() {
        let listed = offending
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(",");
        return Err(DomainError::validation(
            ValidationKind::InvalidClaim,
            format!("cells [{listed}] are marked but their values have not been called"),
        ));
    }
    Ok(asserted.with(FREE_CELL))
}

/// Half-open interval `[start, start + duration)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FairnessWindow {
    pub start: OffsetDateTime,
    pub duration: Duration,
}

impl FairnessWindow {
    pub fn end(&self) -> OffsetDateTime {
        self.start + self.duration
    }

    pub fn contains(&self, at: OffsetDateTime) -> bool {
        at >= self.start && at < self.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowDecision {
    /// No winner yet for this pattern; this claim opens the window.
    Opens(FairnessWindow),
    /// The window is open; this claim joins the split.
    Joins(FairnessWindow),
    /// The window has elapsed; the pattern is resolved.
    Closed(FairnessWindow),
}

impl WindowDecision {
    pub fn window(&self) -> FairnessWindow {
        match self {
            WindowDecision::Opens(w) | WindowDecision::Joins(w) | WindowDecision::Closed(w) => *w,
        }
    }

    pub fn accepts(&self) -> bool {
        !matches!(self, WindowDecision::Closed(_))
    }
}

/// Decide where a claim at `now` falls relative to the pattern's window.
///
/// The window is anchored at `max(first_winner_at, first_call_at)` so a
/// timestamp left over from an earlier game can never extend into this one.
/// Once elapsed it never reopens.
pub fn decide_window(
    first_winner_at: Option<OffsetDateTime>,
    first_call_at: Option<OffsetDateTime>,
    now: OffsetDateTime,
    duration: Duration,
) -> WindowDecision {
    match first_winner_at {
        None => {
            let start = first_call_at.map_or(now, |c| c.max(now));
            WindowDecision::Opens(FairnessWindow { start, duration })
        }
        Some(first) => {
            let start = first_call_at.map_or(first, |c| c.max(first));
            let window = FairnessWindow { start, duration };
            if now < window.end() {
                WindowDecision::Joins(window)
            } else {
                WindowDecision::Closed(window)
            }
        }
    }
}

/// Per-winner share; floor division, remainder is not paid out.
pub fn split_prize(total: i64, winners: usize) -> i64 {
    match i64::try_from(winners) {
        Ok(n) if n > 0 => total.max(0) / n,
        _ => 0,
    }
}

/// An already-recorded winner inside the current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowEntry {
    pub record_id: i64,
    pub player_id: i64,
    pub prize_amount: i64,
}

/// Correction of one existing record to the new share.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrizeCorrection {
    pub record_id: i64,
    pub player_id: i64,
    pub old_amount: i64,
    pub new_amount: i64,
}

impl PrizeCorrection {
    /// Ledger delta for the owning player; negative when a share shrinks.
    pub fn delta(&self) -> i64 {
        self.new_amount - self.old_amount
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPlan {
    pub share: i64,
    pub winners: usize,
    pub corrections: Vec<PrizeCorrection>,
}

/// Recompute the split from scratch for `existing` plus one newcomer.
///
/// The result depends only on the number of winners, so any arrival order
/// converges on the same per-winner amount.
pub fn plan_split(total: i64, existing: &[WindowEntry]) -> SplitPlan {
    let winners = existing.len() + 1;
    let share = split_prize(total, winners);
    let corrections = existing
        .iter()
        .filter(|e| e.prize_amount != share)
        .map(|e| PrizeCorrection {
            record_id: e.record_id,
            player_id: e.player_id,
            old_amount: e.prize_amount,
            new_amount: share,
        })
        .collect();
    SplitPlan {
        share,
        winners,
        corrections,
    }
}
