//! SeaORM adapter for players - generic over ConnectionTrait.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use time::OffsetDateTime;

use crate::entities::players;

pub mod dto;

pub use dto::PlayerCreate;

pub async fn create_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: PlayerCreate,
) -> Result<players::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    let player = players::ActiveModel {
        id: NotSet,
        room_id: Set(dto.room_id),
        display_name: Set(dto.display_name),
        ai_kind: Set(dto.ai_kind),
        wins: Set(0),
        prize_total: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    };
    player.insert(conn).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Option<players::Model>, sea_orm::DbErr> {
    players::Entity::find_by_id(player_id).one(conn).await
}

pub async fn find_by_room_and_name<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    display_name: &str,
) -> Result<Option<players::Model>, sea_orm::DbErr> {
    players::Entity::find()
        .filter(players::Column::RoomId.eq(room_id))
        .filter(players::Column::DisplayName.eq(display_name))
        .one(conn)
        .await
}

/// Players in join order.
pub async fn list_by_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<Vec<players::Model>, sea_orm::DbErr> {
    players::Entity::find()
        .filter(players::Column::RoomId.eq(room_id))
        .order_by_asc(players::Column::Id)
        .all(conn)
        .await
}

pub async fn count_by_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    players::Entity::find()
        .filter(players::Column::RoomId.eq(room_id))
        .count(conn)
        .await
}

/// Atomic ledger increment: `wins = wins + ?`, `prize_total = prize_total + ?`.
///
/// `prize_delta` may be negative when a split shrinks an earlier award.
pub async fn add_to_ledger<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    wins_delta: i32,
    prize_delta: i64,
) -> Result<(), sea_orm::DbErr> {
    let result = players::Entity::update_many()
        .col_expr(
            players::Column::Wins,
            Expr::col(players::Column::Wins).add(wins_delta),
        )
        .col_expr(
            players::Column::PrizeTotal,
            Expr::col(players::Column::PrizeTotal).add(prize_delta),
        )
        .col_expr(
            players::Column::UpdatedAt,
            Expr::val(OffsetDateTime::now_utc()).into(),
        )
        .filter(players::Column::Id.eq(player_id))
        .exec(conn)
        .await?;
    if result.rows_affected == 0 {
        return Err(sea_orm::DbErr::RecordNotFound(format!(
            "Player {player_id} not found"
        )));
    }
    Ok(())
}
