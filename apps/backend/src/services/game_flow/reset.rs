use sea_orm::DatabaseTransaction;
use tracing::info;

use super::GameFlowService;
use crate::domain::lifecycle::ensure_host;
use crate::domain::{RoomConfig, WinMode};
use crate::error::AppError;
use crate::repos::rooms::{self, Room, RoomMode};
use crate::repos::{calls, cards, stages};

/// New win configuration applied on reset. The game type is fixed for the
/// life of the room because cards are dealt from its pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetRequest {
    pub win_mode: WinMode,
    pub prize_override: Option<i64>,
}

impl GameFlowService {
    /// Start the next game in the room.
    ///
    /// Clears calls, marks, stage claims and the winner fields, and advances
    /// `game_no`. Player ledgers and past winner records are kept.
    pub async fn reset_room(
        &self,
        txn: &DatabaseTransaction,
        room_id: i64,
        actor: i64,
        new_config: Option<ResetRequest>,
    ) -> Result<Room, AppError> {
        let room = rooms::require_room(txn, room_id).await?;
        ensure_host(room.host_player_id, actor)?;

        let config = new_config
            .map(|req| RoomConfig::new(room.game_type, req.win_mode, req.prize_override))
            .transpose()?;

        let cleared_calls = calls::delete_by_room(txn, room.id).await?;
        cards::clear_marks_for_room(txn, room.id).await?;

        match &config {
            Some(cfg) => {
                stages::delete_by_room(txn, room.id).await?;
                if let Some(state) = cfg.initial_stages()? {
                    stages::create_for_room(txn, room.id, &state).await?;
                }
            }
            None if room.mode == RoomMode::Progressive => {
                stages::clear_claims(txn, room.id).await?;
            }
            None => {}
        }

        let room = rooms::reset(txn, &room, config.as_ref()).await?;
        info!(
            room_id = room.id,
            game_no = room.game_no,
            cleared_calls,
            reconfigured = config.is_some(),
            "Room reset"
        );
        Ok(room)
    }
}
