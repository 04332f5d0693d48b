use sea_orm::DatabaseTransaction;
use serde::Serialize;
use tracing::debug;

use super::GameFlowService;
use crate::domain::CellSet;
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::repos::{calls, cards, rooms};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkOutcome {
    pub card_id: i64,
    pub cell: u8,
    pub marked: bool,
    /// Whether the cell's value has been called. Advisory only: speculative
    /// marks are stored, and claims validate against the history anyway.
    pub called: bool,
    pub marks: CellSet,
}

impl GameFlowService {
    /// Mark or unmark one cell of a card held by `player_id`.
    pub async fn set_mark(
        &self,
        txn: &DatabaseTransaction,
        room_id: i64,
        player_id: i64,
        card_id: i64,
        cell: u8,
        marked: bool,
    ) -> Result<MarkOutcome, AppError> {
        rooms::require_room(txn, room_id).await?;
        let mut record = cards::require_in_room(txn, room_id, card_id).await?;
        if record.card.player_id != player_id {
            return Err(DomainError::not_found(
                NotFoundKind::Card,
                format!("card {card_id} does not belong to player {player_id}"),
            )
            .into());
        }
        let history = calls::load_history(txn, room_id).await?;

        let changed = if marked {
            record.card.mark(cell)?
        } else {
            record.card.unmark(cell)?
        };
        if changed {
            cards::save_marks(txn, card_id, record.card.marks()).await?;
        }
        let called = record.card.is_valid_mark(cell, &history)?;

        debug!(room_id, card_id, cell, marked, called, changed, "Mark applied");
        Ok(MarkOutcome {
            card_id,
            cell,
            marked,
            called,
            marks: record.card.marks(),
        })
    }
}
