//! SeaORM adapter for progressive stages - generic over ConnectionTrait.

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, Set};
use time::OffsetDateTime;

use crate::entities::progressive_stages;

#[derive(Debug, Clone)]
pub struct StageCreate {
    pub position: i16,
    pub pattern: String,
    pub prize: i64,
}

pub async fn create_many<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    stages: Vec<StageCreate>,
) -> Result<(), sea_orm::DbErr> {
    if stages.is_empty() {
        return Ok(());
    }
    let rows = stages.into_iter().map(|s| progressive_stages::ActiveModel {
        id: NotSet,
        room_id: Set(room_id),
        position: Set(s.position),
        pattern: Set(s.pattern),
        prize: Set(s.prize),
        claimed_by: Set(None),
        claimed_at: Set(None),
    });
    progressive_stages::Entity::insert_many(rows)
        .exec(conn)
        .await?;
    Ok(())
}

pub async fn list_by_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<Vec<progressive_stages::Model>, sea_orm::DbErr> {
    progressive_stages::Entity::find()
        .filter(progressive_stages::Column::RoomId.eq(room_id))
        .order_by_asc(progressive_stages::Column::Position)
        .all(conn)
        .await
}

/// Award a stage only if it is still unclaimed. Returns `true` on success.
pub async fn claim_if_unclaimed<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    position: i16,
    player_id: i64,
    claimed_at: OffsetDateTime,
) -> Result<bool, sea_orm::DbErr> {
    let result = progressive_stages::Entity::update_many()
        .col_expr(
            progressive_stages::Column::ClaimedBy,
            Expr::val(Some(player_id)).into(),
        )
        .col_expr(
            progressive_stages::Column::ClaimedAt,
            Expr::val(Some(claimed_at)).into(),
        )
        .filter(progressive_stages::Column::RoomId.eq(room_id))
        .filter(progressive_stages::Column::Position.eq(position))
        .filter(progressive_stages::Column::ClaimedBy.is_null())
        .exec(conn)
        .await?;
    Ok(result.rows_affected == 1)
}

pub async fn clear_claims<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = progressive_stages::Entity::update_many()
        .col_expr(
            progressive_stages::Column::ClaimedBy,
            Expr::val(None::<i64>).into(),
        )
        .col_expr(
            progressive_stages::Column::ClaimedAt,
            Expr::val(None::<OffsetDateTime>).into(),
        )
        .filter(progressive_stages::Column::RoomId.eq(room_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn delete_by_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = progressive_stages::Entity::delete_many()
        .filter(progressive_stages::Column::RoomId.eq(room_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
