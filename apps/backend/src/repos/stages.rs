//! Progressive stage repository functions.

use sea_orm::{ConnectionTrait, DatabaseTransaction};
use time::OffsetDateTime;

use super::corrupt;
use crate::adapters::stages_sea::{self as stages_adapter, StageCreate};
use crate::domain::progressive::{ProgressiveState, Stage};
use crate::entities::progressive_stages;
use crate::errors::domain::DomainError;

impl TryFrom<progressive_stages::Model> for Stage {
    type Error = DomainError;

    fn try_from(model: progressive_stages::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            position: u8::try_from(model.position).map_err(|e| corrupt("stage position", e))?,
            pattern: model
                .pattern
                .parse()
                .map_err(|e| corrupt("stage pattern", e))?,
            prize: model.prize,
            claimed_by: model.claimed_by,
            claimed_at: model.claimed_at,
        })
    }
}

/// Stored stages for the room, or `None` when the room has none.
pub async fn load_state<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<Option<ProgressiveState>, DomainError> {
    let stages = stages_adapter::list_by_room(conn, room_id)
        .await?
        .into_iter()
        .map(Stage::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    if stages.is_empty() {
        return Ok(None);
    }
    Ok(Some(ProgressiveState::from_stages(stages)))
}

pub async fn create_for_room(
    txn: &DatabaseTransaction,
    room_id: i64,
    state: &ProgressiveState,
) -> Result<(), DomainError> {
    let rows = state
        .stages()
        .iter()
        .map(|s| StageCreate {
            position: i16::from(s.position),
            pattern: s.pattern.as_str().to_string(),
            prize: s.prize,
        })
        .collect();
    Ok(stages_adapter::create_many(txn, room_id, rows).await?)
}

/// Conditional award; `false` means someone else claimed the stage first.
pub async fn claim_if_unclaimed(
    txn: &DatabaseTransaction,
    room_id: i64,
    position: u8,
    player_id: i64,
    claimed_at: OffsetDateTime,
) -> Result<bool, DomainError> {
    Ok(stages_adapter::claim_if_unclaimed(
        txn,
        room_id,
        i16::from(position),
        player_id,
        claimed_at,
    )
    .await?)
}

pub async fn clear_claims(txn: &DatabaseTransaction, room_id: i64) -> Result<u64, DomainError> {
    Ok(stages_adapter::clear_claims(txn, room_id).await?)
}

pub async fn delete_by_room(txn: &DatabaseTransaction, room_id: i64) -> Result<u64, DomainError> {
    Ok(stages_adapter::delete_by_room(txn, room_id).await?)
}
