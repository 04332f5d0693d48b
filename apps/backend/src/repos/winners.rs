//! Winner record repository functions.

use sea_orm::{ConnectionTrait, DatabaseTransaction};
use serde::Serialize;
use time::OffsetDateTime;

use super::corrupt;
use crate::adapters::winners_sea as winners_adapter;
use crate::domain::patterns::Pattern;
use crate::entities::winners;
use crate::errors::domain::DomainError;

/// Persisted audit entry for one awarded claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WinnerRecord {
    pub id: i64,
    pub room_id: i64,
    pub game_no: i32,
    pub player_id: i64,
    pub card_id: i64,
    pub pattern: Pattern,
    pub prize_amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_id: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub claimed_at: OffsetDateTime,
}

impl TryFrom<winners::Model> for WinnerRecord {
    type Error = DomainError;

    fn try_from(model: winners::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            room_id: model.room_id,
            game_no: model.game_no,
            player_id: model.player_id,
            card_id: model.card_id,
            pattern: model
                .win_type
                .parse()
                .map_err(|e| corrupt("winner pattern", e))?,
            prize_amount: model.prize_amount,
            claim_id: model.claim_id,
            claimed_at: model.claimed_at,
        })
    }
}

fn convert_all(rows: Vec<winners::Model>) -> Result<Vec<WinnerRecord>, DomainError> {
    rows.into_iter().map(WinnerRecord::try_from).collect()
}

/// New winner record. Fields mirror the table.
#[derive(Debug, Clone)]
pub struct NewWinner<'a> {
    pub room_id: i64,
    pub game_no: i32,
    pub player_id: i64,
    pub card_id: i64,
    pub pattern: Pattern,
    pub prize_amount: i64,
    pub claim_id: Option<&'a str>,
    pub claimed_at: OffsetDateTime,
}

pub async fn create(
    txn: &DatabaseTransaction,
    new: NewWinner<'_>,
) -> Result<WinnerRecord, DomainError> {
    let dto = winners_adapter::WinnerCreate {
        room_id: new.room_id,
        game_no: new.game_no,
        player_id: new.player_id,
        card_id: new.card_id,
        win_type: new.pattern.as_str().to_string(),
        prize_amount: new.prize_amount,
        claim_id: new.claim_id.map(str::to_string),
        claimed_at: new.claimed_at,
    };
    WinnerRecord::try_from(winners_adapter::create_winner(txn, dto).await?)
}

pub async fn find_for_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    game_no: i32,
    player_id: i64,
    pattern: Pattern,
) -> Result<Option<WinnerRecord>, DomainError> {
    winners_adapter::find_for_player(conn, room_id, game_no, player_id, pattern.as_str())
        .await?
        .map(WinnerRecord::try_from)
        .transpose()
}

/// Every record for `pattern` in this game, oldest first.
pub async fn list_for_pattern<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    game_no: i32,
    pattern: Pattern,
) -> Result<Vec<WinnerRecord>, DomainError> {
    convert_all(winners_adapter::list_for_win_type(conn, room_id, game_no, pattern.as_str()).await?)
}

/// Records for `pattern` claimed within `[from, until)`.
pub async fn list_in_window<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    game_no: i32,
    pattern: Pattern,
    from: OffsetDateTime,
    until: OffsetDateTime,
) -> Result<Vec<WinnerRecord>, DomainError> {
    convert_all(
        winners_adapter::list_in_window(conn, room_id, game_no, pattern.as_str(), from, until)
            .await?,
    )
}

pub async fn list_for_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    game_no: i32,
) -> Result<Vec<WinnerRecord>, DomainError> {
    convert_all(winners_adapter::list_for_game(conn, room_id, game_no).await?)
}

pub async fn cas_prize_amount(
    txn: &DatabaseTransaction,
    winner_id: i64,
    expected: i64,
    new_amount: i64,
) -> Result<bool, DomainError> {
    Ok(winners_adapter::cas_prize_amount(txn, winner_id, expected, new_amount).await?)
}
