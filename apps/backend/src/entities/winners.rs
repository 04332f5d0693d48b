use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Audit record of one awarded claim. `prize_amount` is corrected in place
/// when later claims join the same fairness window.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "winners")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "room_id")]
    pub room_id: i64,
    #[sea_orm(column_name = "game_no")]
    pub game_no: i32,
    #[sea_orm(column_name = "player_id")]
    pub player_id: i64,
    #[sea_orm(column_name = "card_id")]
    pub card_id: i64,
    #[sea_orm(column_name = "win_type")]
    pub win_type: String,
    #[sea_orm(column_name = "prize_amount")]
    pub prize_amount: i64,
    #[sea_orm(column_name = "claim_id")]
    pub claim_id: Option<String>,
    #[sea_orm(column_name = "claimed_at")]
    pub claimed_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::rooms::Entity",
        from = "Column::RoomId",
        to = "super::rooms::Column::Id",
        on_delete = "Cascade"
    )]
    Room,
    #[sea_orm(
        belongs_to = "super::players::Entity",
        from = "Column::PlayerId",
        to = "super::players::Column::Id",
        on_delete = "Cascade"
    )]
    Player,
}

impl Related<super::players::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Player.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
