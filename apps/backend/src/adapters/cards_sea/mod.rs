//! SeaORM adapter for cards - generic over ConnectionTrait.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};
use time::OffsetDateTime;

use crate::entities::cards;

pub mod dto;

pub use dto::CardCreate;

pub async fn create_card<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: CardCreate,
) -> Result<cards::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    let card = cards::ActiveModel {
        id: NotSet,
        room_id: Set(dto.room_id),
        player_id: Set(dto.player_id),
        card_no: Set(dto.card_no),
        layout: Set(dto.layout),
        marked_cells: Set(dto.marked_cells),
        created_at: Set(now),
        updated_at: Set(now),
    };
    card.insert(conn).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    card_id: i64,
) -> Result<Option<cards::Model>, sea_orm::DbErr> {
    cards::Entity::find_by_id(card_id).one(conn).await
}

pub async fn list_by_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Vec<cards::Model>, sea_orm::DbErr> {
    cards::Entity::find()
        .filter(cards::Column::PlayerId.eq(player_id))
        .order_by_asc(cards::Column::CardNo)
        .all(conn)
        .await
}

pub async fn list_by_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<Vec<cards::Model>, sea_orm::DbErr> {
    cards::Entity::find()
        .filter(cards::Column::RoomId.eq(room_id))
        .order_by_asc(cards::Column::PlayerId)
        .order_by_asc(cards::Column::CardNo)
        .all(conn)
        .await
}

/// Replace the stored mark set. The layout column is never written here.
pub async fn update_marks<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    card_id: i64,
    marked_cells: sea_orm::JsonValue,
) -> Result<(), sea_orm::DbErr> {
    let result = cards::Entity::update_many()
        .col_expr(cards::Column::MarkedCells, Expr::val(marked_cells).into())
        .col_expr(
            cards::Column::UpdatedAt,
            Expr::val(OffsetDateTime::now_utc()).into(),
        )
        .filter(cards::Column::Id.eq(card_id))
        .exec(conn)
        .await?;
    if result.rows_affected == 0 {
        return Err(sea_orm::DbErr::RecordNotFound(format!(
            "Card {card_id} not found"
        )));
    }
    Ok(())
}

/// Reset every card in the room to `empty_marks`.
pub async fn clear_marks_for_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    empty_marks: sea_orm::JsonValue,
) -> Result<u64, sea_orm::DbErr> {
    let result = cards::Entity::update_many()
        .col_expr(cards::Column::MarkedCells, Expr::val(empty_marks).into())
        .col_expr(
            cards::Column::UpdatedAt,
            Expr::val(OffsetDateTime::now_utc()).into(),
        )
        .filter(cards::Column::RoomId.eq(room_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
