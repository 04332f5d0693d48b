use sea_orm::DatabaseTransaction;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, info};

use super::{lifecycle_view, GameFlowService};
use crate::domain::calls::pick_next;
use crate::domain::lifecycle::{ensure_can_call, ensure_host};
use crate::domain::seed_derivation::derive_call_seed;
use crate::domain::CalledValue;
use crate::error::AppError;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::repos::{calls, rooms};

/// Who is advancing the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    /// A manual call; must be the room's host.
    Host(i64),
    /// The room's automatic caller.
    Auto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallOutcome {
    pub call: CalledValue,
    /// False when the value had already been called and nothing was written.
    pub appended: bool,
}

impl GameFlowService {
    /// Append a call to the room's history.
    ///
    /// With `value` set, that exact value is called; otherwise the next value
    /// is drawn from the remaining pool with the room's seeded RNG. Calling a
    /// value twice returns the existing call unchanged. An appended call bumps
    /// the room version.
    pub async fn append_call(
        &self,
        txn: &DatabaseTransaction,
        room_id: i64,
        caller: Caller,
        value: Option<&str>,
        now: OffsetDateTime,
    ) -> Result<CallOutcome, AppError> {
        let room = rooms::require_room(txn, room_id).await?;
        if let Caller::Host(actor) = caller {
            ensure_host(room.host_player_id, actor)?;
        }
        let mut history = calls::load_history(txn, room.id).await?;

        if let Some(existing) = value.and_then(|v| history.get(v.trim())) {
            debug!(room_id, value = %existing.value, seq = existing.seq, "Value already called");
            return Ok(CallOutcome {
                call: existing.clone(),
                appended: false,
            });
        }

        let view = lifecycle_view(txn, &room, &history).await?;
        ensure_can_call(&view)?;
        // Claims bump the same row, so a winner committed after the check
        // above fails this call with OPTIMISTIC_LOCK instead of slipping in.
        let room = rooms::bump_version(txn, &room).await?;

        let next = match value.map(str::trim) {
            Some(v) => {
                if !room.game_type.in_pool(v) {
                    return Err(DomainError::validation(
                        ValidationKind::ValueNotInPool,
                        format!("'{v}' is not a {} value", room.game_type),
                    )
                    .into());
                }
                v.to_string()
            }
            None => {
                let seed = derive_call_seed(room.rng_seed, room.game_no, history.next_seq());
                pick_next(room.game_type, &history, seed).ok_or_else(|| {
                    DomainError::validation(ValidationKind::CallsExhausted, "no values remain")
                })?
            }
        };

        let call = history.append(next, now)?.clone();
        let stored = calls::append(txn, room.id, &call).await?;

        info!(
            room_id,
            game_no = room.game_no,
            seq = stored.seq,
            value = %stored.value,
            auto = matches!(caller, Caller::Auto),
            "Call appended"
        );
        Ok(CallOutcome {
            call: stored,
            appended: true,
        })
    }
}
