//! Automated player trait definition.

use crate::domain::{CallHistory, CalledValue, Card, CellSet, Pattern};

/// Trait for automated players.
///
/// A bot sees exactly what a human client sees: its own card and the public
/// call history. Whatever it decides is applied through the same mark and
/// claim operations a human request goes through, so a bot can never award
/// itself anything the adjudicator would reject.
pub trait AutoPlayer: Send + Sync {
    /// Cells to mark on `card` in response to `call`. Empty when the bot
    /// does nothing.
    fn decide_marks(&self, card: &Card, call: &CalledValue) -> CellSet;

    /// Whether the bot submits a claim for `card` now, given the patterns
    /// still claimable in the room.
    fn wants_claim(&self, card: &Card, history: &CallHistory, claimable: &[Pattern]) -> bool;
}

/// Cell holding `call`'s value on `card`, if any.
pub(crate) fn matching_cell(card: &Card, call: &CalledValue) -> CellSet {
    card.layout()
        .position_of(&call.value)
        .map_or_else(CellSet::empty, CellSet::single)
}

/// True if the card's stored, call-backed marks satisfy any claimable pattern.
pub(crate) fn satisfies_any(card: &Card, history: &CallHistory, claimable: &[Pattern]) -> bool {
    let marks = card.snapshot_marks(history);
    claimable.iter().any(|p| p.is_satisfied(marks))
}
