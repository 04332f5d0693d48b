//! Room repository functions for the domain layer.

use sea_orm::{ConnectionTrait, DatabaseTransaction};
use time::OffsetDateTime;

use super::corrupt;
use crate::adapters::rooms_sea as rooms_adapter;
use crate::domain::calls::GameType;
use crate::domain::patterns::Pattern;
use crate::domain::room_config::{RoomConfig, WinMode};
use crate::entities::rooms::{self, RoomGameType, RoomWinMode};
use crate::errors::domain::DomainError;

/// The room's win mode as stored. Progressive stages live in their own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomMode {
    Single(Pattern),
    Progressive,
}

impl RoomMode {
    pub fn single_pattern(self) -> Option<Pattern> {
        match self {
            RoomMode::Single(p) => Some(p),
            RoomMode::Progressive => None,
        }
    }
}

/// Room domain model
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: i64,
    pub room_code: String,
    pub host_player_id: Option<i64>,
    pub game_type: GameType,
    pub mode: RoomMode,
    pub prize_value: i64,
    pub game_no: i32,
    pub rng_seed: i64,
    pub winner_player_id: Option<i64>,
    pub window_opened_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub version: i32,
}

impl From<GameType> for RoomGameType {
    fn from(value: GameType) -> Self {
        match value {
            GameType::Numbers => RoomGameType::Numbers,
            GameType::Words => RoomGameType::Words,
        }
    }
}

impl From<RoomGameType> for GameType {
    fn from(value: RoomGameType) -> Self {
        match value {
            RoomGameType::Numbers => GameType::Numbers,
            RoomGameType::Words => GameType::Words,
        }
    }
}

impl TryFrom<rooms::Model> for Room {
    type Error = DomainError;

    fn try_from(model: rooms::Model) -> Result<Self, Self::Error> {
        let mode = match (model.win_mode, model.pattern.as_deref()) {
            (RoomWinMode::Single, Some(p)) => {
                RoomMode::Single(p.parse().map_err(|e| corrupt("room pattern", e))?)
            }
            (RoomWinMode::Single, None) => {
                return Err(corrupt("room pattern", "single mode without a pattern"))
            }
            (RoomWinMode::Progressive, _) => RoomMode::Progressive,
        };
        Ok(Self {
            id: model.id,
            room_code: model.room_code,
            host_player_id: model.host_player_id,
            game_type: model.game_type.into(),
            mode,
            prize_value: model.prize_value,
            game_no: model.game_no,
            rng_seed: model.rng_seed,
            winner_player_id: model.winner_player_id,
            window_opened_at: model.window_opened_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
            version: model.version,
        })
    }
}

fn columns_for(config: &RoomConfig) -> (RoomWinMode, Option<String>) {
    match &config.win_mode {
        WinMode::Single { pattern } => (RoomWinMode::Single, Some(pattern.as_str().to_string())),
        WinMode::Progressive { .. } => (RoomWinMode::Progressive, None),
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<Option<Room>, DomainError> {
    rooms_adapter::find_by_id(conn, room_id)
        .await?
        .map(Room::try_from)
        .transpose()
}

/// Find room by ID or fail with `NotFound(Room)`.
pub async fn require_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<Room, DomainError> {
    Room::try_from(rooms_adapter::require_room(conn, room_id).await?)
}

pub async fn find_by_code<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_code: &str,
) -> Result<Option<Room>, DomainError> {
    rooms_adapter::find_by_code(conn, room_code)
        .await?
        .map(Room::try_from)
        .transpose()
}

pub async fn create_room(
    txn: &DatabaseTransaction,
    room_code: &str,
    config: &RoomConfig,
    rng_seed: i64,
) -> Result<Room, DomainError> {
    let base = rooms_adapter::RoomCreate::new(room_code, config.game_type.into(), rng_seed);
    let dto = match config.win_mode.single_pattern() {
        Some(pattern) => base.single(pattern.as_str(), config.prize_value()),
        None => base.progressive(config.prize_value()),
    };
    Room::try_from(rooms_adapter::create_room(txn, dto).await?)
}

pub async fn set_host(
    txn: &DatabaseTransaction,
    room: &Room,
    host_player_id: i64,
) -> Result<Room, DomainError> {
    Room::try_from(rooms_adapter::set_host(txn, room.id, room.version, host_player_id).await?)
}

pub async fn bump_version(txn: &DatabaseTransaction, room: &Room) -> Result<Room, DomainError> {
    Room::try_from(rooms_adapter::bump_version(txn, room.id, room.version).await?)
}

pub async fn touch(txn: &DatabaseTransaction, room_id: i64) -> Result<(), DomainError> {
    Ok(rooms_adapter::touch(txn, room_id).await?)
}

pub async fn set_winner_if_absent(
    txn: &DatabaseTransaction,
    room_id: i64,
    player_id: i64,
    window_opened_at: Option<OffsetDateTime>,
) -> Result<bool, DomainError> {
    Ok(rooms_adapter::set_winner_if_absent(txn, room_id, player_id, window_opened_at).await?)
}

/// Advance to the next game, clearing winner and window. `new_config`
/// replaces the win mode and prize when given.
pub async fn reset(
    txn: &DatabaseTransaction,
    room: &Room,
    new_config: Option<&RoomConfig>,
) -> Result<Room, DomainError> {
    let mut dto = rooms_adapter::RoomReset::new(room.id, room.version, room.game_no + 1);
    if let Some(config) = new_config {
        let (win_mode, pattern) = columns_for(config);
        dto = dto.with_config(rooms_adapter::RoomResetConfig {
            win_mode,
            pattern,
            prize_value: config.prize_value(),
        });
    }
    Room::try_from(rooms_adapter::apply_reset(txn, dto).await?)
}
