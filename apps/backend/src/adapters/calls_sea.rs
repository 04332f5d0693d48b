//! SeaORM adapter for the call history - generic over ConnectionTrait.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};
use time::OffsetDateTime;

use crate::entities::calls;

/// Insert one call. The unique indexes on (room_id, seq) and
/// (room_id, value) reject concurrent duplicates.
pub async fn append_call<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    seq: i32,
    value: &str,
    called_at: OffsetDateTime,
) -> Result<calls::Model, sea_orm::DbErr> {
    let call = calls::ActiveModel {
        id: NotSet,
        room_id: Set(room_id),
        seq: Set(seq),
        value: Set(value.to_string()),
        called_at: Set(called_at),
    };
    call.insert(conn).await
}

/// The room's current history, ordered by sequence.
pub async fn list_by_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<Vec<calls::Model>, sea_orm::DbErr> {
    calls::Entity::find()
        .filter(calls::Column::RoomId.eq(room_id))
        .order_by_asc(calls::Column::Seq)
        .all(conn)
        .await
}

pub async fn delete_by_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = calls::Entity::delete_many()
        .filter(calls::Column::RoomId.eq(room_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
