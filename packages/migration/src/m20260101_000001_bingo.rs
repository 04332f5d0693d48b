use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Rooms {
    Table,
    Id,
    RoomCode,
    HostPlayerId,
    GameType,
    WinMode,
    Pattern,
    PrizeValue,
    GameNo,
    RngSeed,
    WinnerPlayerId,
    WindowOpenedAt,
    CreatedAt,
    UpdatedAt,
    Version,
}

#[derive(Iden)]
enum Players {
    Table,
    Id,
    RoomId,
    DisplayName,
    AiKind,
    Wins,
    PrizeTotal,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Cards {
    Table,
    Id,
    RoomId,
    PlayerId,
    CardNo,
    Layout,
    MarkedCells,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Calls {
    Table,
    Id,
    RoomId,
    Seq,
    Value,
    CalledAt,
}

#[derive(Iden)]
enum Winners {
    Table,
    Id,
    RoomId,
    GameNo,
    PlayerId,
    CardId,
    WinType,
    PrizeAmount,
    ClaimId,
    ClaimedAt,
}

#[derive(Iden)]
enum ProgressiveStages {
    Table,
    Id,
    RoomId,
    Position,
    Pattern,
    Prize,
    ClaimedBy,
    ClaimedAt,
}

fn id_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .primary_key()
        .auto_increment()
        .to_owned()
}

fn ts_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Enum-like columns are plain strings so the schema is identical on
        // Postgres and SQLite.

        // rooms
        manager
            .create_table(
                Table::create()
                    .table(Rooms::Table)
                    .if_not_exists()
                    .col(id_col(Rooms::Id))
                    .col(
                        ColumnDef::new(Rooms::RoomCode)
                            .string_len(12)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Rooms::HostPlayerId).big_integer().null())
                    .col(ColumnDef::new(Rooms::GameType).string().not_null())
                    .col(ColumnDef::new(Rooms::WinMode).string().not_null())
                    .col(ColumnDef::new(Rooms::Pattern).string().null())
                    .col(ColumnDef::new(Rooms::PrizeValue).big_integer().not_null())
                    .col(
                        ColumnDef::new(Rooms::GameNo)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Rooms::RngSeed).big_integer().not_null())
                    .col(ColumnDef::new(Rooms::WinnerPlayerId).big_integer().null())
                    .col(
                        ColumnDef::new(Rooms::WindowOpenedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ts_col(Rooms::CreatedAt))
                    .col(ts_col(Rooms::UpdatedAt))
                    .col(
                        ColumnDef::new(Rooms::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .to_owned(),
            )
            .await?;

        // players
        manager
            .create_table(
                Table::create()
                    .table(Players::Table)
                    .if_not_exists()
                    .col(id_col(Players::Id))
                    .col(ColumnDef::new(Players::RoomId).big_integer().not_null())
                    .col(ColumnDef::new(Players::DisplayName).string().not_null())
                    .col(ColumnDef::new(Players::AiKind).string().null())
                    .col(
                        ColumnDef::new(Players::Wins)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Players::PrizeTotal)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ts_col(Players::CreatedAt))
                    .col(ts_col(Players::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_players_room_id")
                            .from(Players::Table, Players::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_players_room_display_name")
                    .table(Players::Table)
                    .col(Players::RoomId)
                    .col(Players::DisplayName)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // cards
        manager
            .create_table(
                Table::create()
                    .table(Cards::Table)
                    .if_not_exists()
                    .col(id_col(Cards::Id))
                    .col(ColumnDef::new(Cards::RoomId).big_integer().not_null())
                    .col(ColumnDef::new(Cards::PlayerId).big_integer().not_null())
                    .col(ColumnDef::new(Cards::CardNo).small_integer().not_null())
                    .col(ColumnDef::new(Cards::Layout).json_binary().not_null())
                    .col(ColumnDef::new(Cards::MarkedCells).json_binary().not_null())
                    .col(ts_col(Cards::CreatedAt))
                    .col(ts_col(Cards::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cards_room_id")
                            .from(Cards::Table, Cards::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cards_player_id")
                            .from(Cards::Table, Cards::PlayerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_cards_player_card_no")
                    .table(Cards::Table)
                    .col(Cards::PlayerId)
                    .col(Cards::CardNo)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // calls
        manager
            .create_table(
                Table::create()
                    .table(Calls::Table)
                    .if_not_exists()
                    .col(id_col(Calls::Id))
                    .col(ColumnDef::new(Calls::RoomId).big_integer().not_null())
                    .col(ColumnDef::new(Calls::Seq).integer().not_null())
                    .col(ColumnDef::new(Calls::Value).string().not_null())
                    .col(ts_col(Calls::CalledAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_calls_room_id")
                            .from(Calls::Table, Calls::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_calls_room_seq")
                    .table(Calls::Table)
                    .col(Calls::RoomId)
                    .col(Calls::Seq)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_calls_room_value")
                    .table(Calls::Table)
                    .col(Calls::RoomId)
                    .col(Calls::Value)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // winners
        manager
            .create_table(
                Table::create()
                    .table(Winners::Table)
                    .if_not_exists()
                    .col(id_col(Winners::Id))
                    .col(ColumnDef::new(Winners::RoomId).big_integer().not_null())
                    .col(ColumnDef::new(Winners::GameNo).integer().not_null())
                    .col(ColumnDef::new(Winners::PlayerId).big_integer().not_null())
                    .col(ColumnDef::new(Winners::CardId).big_integer().not_null())
                    .col(ColumnDef::new(Winners::WinType).string().not_null())
                    .col(ColumnDef::new(Winners::PrizeAmount).big_integer().not_null())
                    .col(ColumnDef::new(Winners::ClaimId).string().null())
                    .col(ts_col(Winners::ClaimedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_winners_room_id")
                            .from(Winners::Table, Winners::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_winners_player_id")
                            .from(Winners::Table, Winners::PlayerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_winners_room_game_player_type")
                    .table(Winners::Table)
                    .col(Winners::RoomId)
                    .col(Winners::GameNo)
                    .col(Winners::PlayerId)
                    .col(Winners::WinType)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_winners_room_game_type")
                    .table(Winners::Table)
                    .col(Winners::RoomId)
                    .col(Winners::GameNo)
                    .col(Winners::WinType)
                    .to_owned(),
            )
            .await?;

        // progressive_stages
        manager
            .create_table(
                Table::create()
                    .table(ProgressiveStages::Table)
                    .if_not_exists()
                    .col(id_col(ProgressiveStages::Id))
                    .col(
                        ColumnDef::new(ProgressiveStages::RoomId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProgressiveStages::Position)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProgressiveStages::Pattern).string().not_null())
                    .col(
                        ColumnDef::new(ProgressiveStages::Prize)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProgressiveStages::ClaimedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ProgressiveStages::ClaimedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_progressive_stages_room_id")
                            .from(ProgressiveStages::Table, ProgressiveStages::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_progressive_stages_room_position")
                    .table(ProgressiveStages::Table)
                    .col(ProgressiveStages::RoomId)
                    .col(ProgressiveStages::Position)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // drop in reverse order; indexes go with their tables
        manager
            .drop_table(Table::drop().table(ProgressiveStages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Winners::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Calls::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cards::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Players::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rooms::Table).to_owned())
            .await?;
        Ok(())
    }
}
