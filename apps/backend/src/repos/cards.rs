//! Card repository functions for the domain layer.
//!
//! Layouts and mark sets are stored as JSON. The layout is written once at
//! insert and never again, so re-reading a card always yields the same grid.

use sea_orm::{ConnectionTrait, DatabaseTransaction};

use super::corrupt;
use crate::adapters::cards_sea as cards_adapter;
use crate::domain::card::{Card, CardLayout};
use crate::domain::cells::CellSet;
use crate::entities::cards;
use crate::errors::domain::{DomainError, NotFoundKind};

/// A card together with where it lives.
#[derive(Debug, Clone, PartialEq)]
pub struct CardRecord {
    pub room_id: i64,
    pub card_no: i16,
    pub card: Card,
}

impl TryFrom<cards::Model> for CardRecord {
    type Error = DomainError;

    fn try_from(model: cards::Model) -> Result<Self, Self::Error> {
        let layout: CardLayout =
            serde_json::from_value(model.layout).map_err(|e| corrupt("card layout", e))?;
        let marks: CellSet =
            serde_json::from_value(model.marked_cells).map_err(|e| corrupt("card marks", e))?;
        Ok(Self {
            room_id: model.room_id,
            card_no: model.card_no,
            card: Card::new(model.id, model.player_id, layout, marks),
        })
    }
}

fn marks_json(marks: CellSet) -> Result<sea_orm::JsonValue, DomainError> {
    serde_json::to_value(marks).map_err(|e| corrupt("card marks", e))
}

pub async fn create_card(
    txn: &DatabaseTransaction,
    room_id: i64,
    player_id: i64,
    card_no: i16,
    layout: &CardLayout,
) -> Result<CardRecord, DomainError> {
    let layout = serde_json::to_value(layout).map_err(|e| corrupt("card layout", e))?;
    let dto = cards_adapter::CardCreate::new(
        room_id,
        player_id,
        card_no,
        layout,
        marks_json(CellSet::empty())?,
    );
    CardRecord::try_from(cards_adapter::create_card(txn, dto).await?)
}

/// Card in the given room, or `NotFound(Card)`.
pub async fn require_in_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
    card_id: i64,
) -> Result<CardRecord, DomainError> {
    let record = match cards_adapter::find_by_id(conn, card_id).await? {
        Some(model) => Some(CardRecord::try_from(model)?),
        None => None,
    };
    record.filter(|r| r.room_id == room_id).ok_or_else(|| {
        DomainError::not_found(
            NotFoundKind::Card,
            format!("Card {card_id} not found in room {room_id}"),
        )
    })
}

pub async fn list_by_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Vec<CardRecord>, DomainError> {
    cards_adapter::list_by_player(conn, player_id)
        .await?
        .into_iter()
        .map(CardRecord::try_from)
        .collect()
}

pub async fn list_by_room<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room_id: i64,
) -> Result<Vec<CardRecord>, DomainError> {
    cards_adapter::list_by_room(conn, room_id)
        .await?
        .into_iter()
        .map(CardRecord::try_from)
        .collect()
}

pub async fn save_marks(
    txn: &DatabaseTransaction,
    card_id: i64,
    marks: CellSet,
) -> Result<(), DomainError> {
    Ok(cards_adapter::update_marks(txn, card_id, marks_json(marks)?).await?)
}

pub async fn clear_marks_for_room(
    txn: &DatabaseTransaction,
    room_id: i64,
) -> Result<u64, DomainError> {
    Ok(cards_adapter::clear_marks_for_room(txn, room_id, marks_json(CellSet::empty())?).await?)
}
