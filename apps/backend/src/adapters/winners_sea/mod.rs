//! SeaORM adapter for winner records - generic over ConnectionTrait.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};
use time::OffsetDateTime;

use crate::entities::winners;

pub mod dto;

pub use dto::WinnerCreate;

pub async fn create_winner<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: WinnerCreate,
) -> Result<winners::Model, sea_orm::DbErr> {
    let winner = winners::ActiveModel {
        id: NotSet,
        room_id: Set(dto.room_id),
        game_no: Set(dto.game_no),
        player_id: Set(dto.player_id),
        card_id: Set(dto.card_id),
        win_type: Set(dto.win_type),
        prize_amount: Set(dto.prize_amount),
        claim_id: Set(dto.claim_id),
        claimed_at: Set(dto.claimed_at),
    };
    winner.insert(conn).await
}

pub async fn find_for_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    game_no: i32,
    player_id: i64,
    win_type: &str,
) -> Result<Option<winners::Model>, sea_orm::DbErr> {
    winners::Entity::find()
        .filter(winners::Column::RoomId.eq(room_id))
        .filter(winners::Column::GameNo.eq(game_no))
        .filter(winners::Column::PlayerId.eq(player_id))
        .filter(winners::Column::WinType.eq(win_type))
        .one(conn)
        .await
}

/// Records for one pattern in one game, oldest first.
pub async fn list_for_win_type<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    game_no: i32,
    win_type: &str,
) -> Result<Vec<winners::Model>, sea_orm::DbErr> {
    winners::Entity::find()
        .filter(winners::Column::RoomId.eq(room_id))
        .filter(winners::Column::GameNo.eq(game_no))
        .filter(winners::Column::WinType.eq(win_type))
        .order_by_asc(winners::Column::ClaimedAt)
        .order_by_asc(winners::Column::Id)
        .all(conn)
        .await
}

/// Records for one pattern whose `claimed_at` falls in `[from, until)`.
pub async fn list_in_window<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    game_no: i32,
    win_type: &str,
    from: OffsetDateTime,
    until: OffsetDateTime,
) -> Result<Vec<winners::Model>, sea_orm::DbErr> {
    winners::Entity::find()
        .filter(winners::Column::RoomId.eq(room_id))
        .filter(winners::Column::GameNo.eq(game_no))
        .filter(winners::Column::WinType.eq(win_type))
        .filter(winners::Column::ClaimedAt.gte(from))
        .filter(winners::Column::ClaimedAt.lt(until))
        .order_by_asc(winners::Column::ClaimedAt)
        .order_by_asc(winners::Column::Id)
        .all(conn)
        .await
}

pub async fn list_for_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    game_no: i32,
) -> Result<Vec<winners::Model>, sea_orm::DbErr> {
    winners::Entity::find()
        .filter(winners::Column::RoomId.eq(room_id))
        .filter(winners::Column::GameNo.eq(game_no))
        .order_by_asc(winners::Column::ClaimedAt)
        .order_by_asc(winners::Column::Id)
        .all(conn)
        .await
}

/// Compare-and-swap the awarded amount. Returns `false` if the record no
/// longer holds `expected`.
pub async fn cas_prize_amount<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    winner_id: i64,
    expected: i64,
    new_amount: i64,
) -> Result<bool, sea_orm::DbErr> {
    let result = winners::Entity::update_many()
        .col_expr(winners::Column::PrizeAmount, Expr::val(new_amount).into())
        .filter(winners::Column::Id.eq(winner_id))
        .filter(winners::Column::PrizeAmount.eq(expected))
        .exec(conn)
        .await?;
    Ok(result.rows_affected == 1)
}
