use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum RoomGameType {
    #[sea_orm(string_value = "NUMBERS")]
    Numbers,
    #[sea_orm(string_value = "WORDS")]
    Words,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum RoomWinMode {
    #[sea_orm(string_value = "SINGLE")]
    Single,
    #[sea_orm(string_value = "PROGRESSIVE")]
    Progressive,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "room_code", unique)]
    pub room_code: String,
    #[sea_orm(column_name = "host_player_id")]
    pub host_player_id: Option<i64>,
    #[sea_orm(column_name = "game_type")]
    pub game_type: RoomGameType,
    #[sea_orm(column_name = "win_mode")]
    pub win_mode: RoomWinMode,
    pub pattern: Option<String>,
    #[sea_orm(column_name = "prize_value")]
    pub prize_value: i64,
    #[sea_orm(column_name = "game_no")]
    pub game_no: i32,
    #[sea_orm(column_name = "rng_seed")]
    pub rng_seed: i64,
    #[sea_orm(column_name = "winner_player_id")]
    pub winner_player_id: Option<i64>,
    #[sea_orm(column_name = "window_opened_at")]
    pub window_opened_at: Option<OffsetDateTime>,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::players::Entity")]
    Players,
    #[sea_orm(has_many = "super::calls::Entity")]
    Calls,
    #[sea_orm(has_many = "super::progressive_stages::Entity")]
    ProgressiveStages,
}

impl Related<super::players::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Players.def()
    }
}

impl Related<super::calls::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Calls.def()
    }
}

impl Related<super::progressive_stages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProgressiveStages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
