//! Call history repository functions.

use sea_orm::{ConnectionTrait, DatabaseTransaction};

use super::corrupt;
use crate::adapters::calls_sea as calls_adapter;
use crate::domain::calls::{CallHistory, CalledValue};
use crate::entities::calls;
use crate::errors::domain::DomainError;

impl TryFrom<calls::Model> for CalledValue {
    type Error = DomainError;

    fn try_from(model: calls::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            seq: u32::try_from(model.seq).map_err(|e| corrupt("call sequence", e))?,
            value: model.value,
            called_at: model.called_at,
        })
    }
}

/// The room's current history, validated for order and uniqueness.
pub async fn load_history<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<CallHistory, DomainError> {
    let calls = calls_adapter::list_by_room(conn, room_id)
        .await?
        .into_iter()
        .map(CalledValue::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    CallHistory::from_calls(calls)
}

pub async fn append(
    txn: &DatabaseTransaction,
    room_id: i64,
    call: &CalledValue,
) -> Result<CalledValue, DomainError> {
    let seq = i32::try_from(call.seq).map_err(|e| corrupt("call sequence", e))?;
    let model = calls_adapter::append_call(txn, room_id, seq, &call.value, call.called_at).await?;
    CalledValue::try_from(model)
}

pub async fn delete_by_room(txn: &DatabaseTransaction, room_id: i64) -> Result<u64, DomainError> {
    Ok(calls_adapter::delete_by_room(txn, room_id).await?)
}
