//! Player repository functions for the domain layer.

use sea_orm::{ConnectionTrait, DatabaseTransaction};

use crate::adapters::players_sea as players_adapter;
use crate::entities::players;
use crate::errors::domain::{DomainError, NotFoundKind};

/// Player domain model. `wins` and `prize_total` are cumulative across
/// resets of the same room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: i64,
    pub room_id: i64,
    pub display_name: String,
    pub ai_kind: Option<String>,
    pub wins: i32,
    pub prize_total: i64,
}

impl Player {
    pub fn is_bot(&self) -> bool {
        self.ai_kind.is_some()
    }
}

impl From<players::Model> for Player {
    fn from(model: players::Model) -> Self {
        Self {
            id: model.id,
            room_id: model.room_id,
            display_name: model.display_name,
            ai_kind: model.ai_kind,
            wins: model.wins,
            prize_total: model.prize_total,
        }
    }
}

pub async fn create_player(
    txn: &DatabaseTransaction,
    room_id: i64,
    display_name: &str,
    ai_kind: Option<&str>,
) -> Result<Player, DomainError> {
    let mut dto = players_adapter::PlayerCreate::human(room_id, display_name);
    if let Some(kind) = ai_kind {
        dto = dto.with_ai_kind(kind);
    }
    Ok(Player::from(players_adapter::create_player(txn, dto).await?))
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Option<Player>, DomainError> {
    Ok(players_adapter::find_by_id(conn, player_id)
        .await?
        .map(Player::from))
}

/// Player in the given room, or `NotFound(Player)`.
pub async fn require_in_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    player_id: i64,
) -> Result<Player, DomainError> {
    find_by_id(conn, player_id)
        .await?
        .filter(|p| p.room_id == room_id)
        .ok_or_else(|| {
            DomainError::not_found(
                NotFoundKind::Player,
                format!("Player {player_id} not found in room {room_id}"),
            )
        })
}

pub async fn find_by_room_and_name<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    display_name: &str,
) -> Result<Option<Player>, DomainError> {
    Ok(
        players_adapter::find_by_room_and_name(conn, room_id, display_name)
            .await?
            .map(Player::from),
    )
}

pub async fn list_by_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<Vec<Player>, DomainError> {
    let rows = players_adapter::list_by_room(conn, room_id).await?;
    Ok(rows.into_iter().map(Player::from).collect())
}

pub async fn count_by_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<u64, DomainError> {
    Ok(players_adapter::count_by_room(conn, room_id).await?)
}

pub async fn add_to_ledger(
    txn: &DatabaseTransaction,
    player_id: i64,
    wins_delta: i32,
    prize_delta: i64,
) -> Result<(), DomainError> {
    Ok(players_adapter::add_to_ledger(txn, player_id, wins_delta, prize_delta).await?)
}
