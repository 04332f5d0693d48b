//! Room setup: creating a room with its host, joining by code, dealing cards.

use rand::Rng;
use sea_orm::{ConnectionTrait, DatabaseTransaction};
use tracing::{debug, info};

use crate::ai;
use crate::config::game::GameSettings;
use crate::domain::dealing::deal_layout;
use crate::domain::seed_derivation::derive_card_seed;
use crate::domain::RoomConfig;
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::repos::cards::CardRecord;
use crate::repos::players::Player;
use crate::repos::rooms::Room;
use crate::repos::{cards, players, rooms, stages};
use crate::utils::room_code::{self, generate_room_code};

const MAX_DISPLAY_NAME_CHARS: usize = 32;
const ROOM_CODE_ATTEMPTS: usize = 5;

/// A player together with the room they are in and their dealt cards.
#[derive(Debug, Clone)]
pub struct Seated {
    pub room: Room,
    pub player: Player,
    pub cards: Vec<CardRecord>,
}

pub struct RoomService {
    settings: GameSettings,
}

fn normalize_display_name(raw: &str) -> Result<String, DomainError> {
    let name = raw.trim();
    let chars = name.chars().count();
    if chars == 0 || chars > MAX_DISPLAY_NAME_CHARS {
        return Err(DomainError::validation(
            ValidationKind::InvalidDisplayName,
            format!("display name must be 1-{MAX_DISPLAY_NAME_CHARS} characters"),
        ));
    }
    Ok(name.to_string())
}

impl RoomService {
    pub fn new(settings: GameSettings) -> Self {
        Self { settings }
    }

    fn check_card_count(&self, count: u8) -> Result<(), DomainError> {
        let max = self.settings.max_cards_per_player;
        if count == 0 || count > max {
            return Err(DomainError::validation(
                ValidationKind::InvalidCardCount,
                format!("card count must be between 1 and {max}, got {count}"),
            ));
        }
        Ok(())
    }

    /// Create a room and seat its host.
    pub async fn create_room(
        &self,
        txn: &DatabaseTransaction,
        host_name: &str,
        config: &RoomConfig,
        card_count: u8,
    ) -> Result<Seated, AppError> {
        let host_name = normalize_display_name(host_name)?;
        self.check_card_count(card_count)?;
        let stage_state = config.initial_stages()?;

        let code = self.unused_room_code(txn).await?;
        let rng_seed: i64 = rand::rng().random();
        let room = rooms::create_room(txn, &code, config, rng_seed).await?;
        if let Some(state) = &stage_state {
            stages::create_for_room(txn, room.id, state).await?;
        }

        let host = players::create_player(txn, room.id, &host_name, None).await?;
        let room = rooms::set_host(txn, &room, host.id).await?;
        let cards = deal_cards(txn, &room, &host, card_count).await?;

        info!(
            room_id = room.id,
            room_code = %room.room_code,
            host_player_id = host.id,
            game_type = %room.game_type,
            "Room created"
        );
        Ok(Seated {
            room,
            player: host,
            cards,
        })
    }

    /// Join a room by code. Bots join the same way with `ai_kind` set.
    pub async fn join_room(
        &self,
        txn: &DatabaseTransaction,
        code: &str,
        display_name: &str,
        card_count: u8,
        ai_kind: Option<&str>,
    ) -> Result<Seated, AppError> {
        let display_name = normalize_display_name(display_name)?;
        self.check_card_count(card_count)?;
        if let Some(kind) = ai_kind {
            ai::ensure_known(kind)?;
        }

        let room = match room_code::normalize(code) {
            Some(code) => rooms::find_by_code(txn, &code).await?,
            None => None,
        }
        .ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Room, format!("no room with code '{code}'"))
        })?;

        let seated = players::count_by_room(txn, room.id).await?;
        if seated >= self.settings.max_players {
            return Err(DomainError::conflict(
                ConflictKind::RoomFull,
                format!("room {} already has {seated} players", room.room_code),
            )
            .into());
        }
        if players::find_by_room_and_name(txn, room.id, &display_name)
            .await?
            .is_some()
        {
            return Err(DomainError::conflict(
                ConflictKind::DisplayNameTaken,
                format!("'{display_name}' is already taken in this room"),
            )
            .into());
        }

        let player = players::create_player(txn, room.id, &display_name, ai_kind).await?;
        let cards = deal_cards(txn, &room, &player, card_count).await?;
        rooms::touch(txn, room.id).await?;

        info!(
            room_id = room.id,
            player_id = player.id,
            bot = player.is_bot(),
            cards = cards.len(),
            "Player joined"
        );
        Ok(Seated {
            room,
            player,
            cards,
        })
    }

    /// Cards held by a player in the given room.
    pub async fn player_cards<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        room_id: i64,
        player_id: i64,
    ) -> Result<Vec<CardRecord>, AppError> {
        rooms::require_room(conn, room_id).await?;
        players::require_in_room(conn, room_id, player_id).await?;
        Ok(cards::list_by_player(conn, player_id).await?)
    }

    /// Pick a code no existing room uses. Checked up front because a unique
    /// violation would poison the surrounding Postgres transaction.
    async fn unused_room_code(&self, txn: &DatabaseTransaction) -> Result<String, AppError> {
        for attempt in 1..=ROOM_CODE_ATTEMPTS {
            let code = generate_room_code();
            if rooms::find_by_code(txn, &code).await?.is_none() {
                return Ok(code);
            }
            debug!(attempt, "room code collision");
        }
        Err(DomainError::conflict(
            ConflictKind::RoomCodeConflict,
            "could not allocate a unique room code",
        )
        .into())
    }
}

async fn deal_cards(
    txn: &DatabaseTransaction,
    room: &Room,
    player: &Player,
    count: u8,
) -> Result<Vec<CardRecord>, AppError> {
    let mut dealt = Vec::with_capacity(usize::from(count));
    for card_no in 0..i16::from(count) {
        let seed = derive_card_seed(room.rng_seed, player.id, card_no);
        let layout = deal_layout(room.game_type, seed)?;
        dealt.push(cards::create_card(txn, room.id, player.id, card_no, &layout).await?);
    }
    Ok(dealt)
}
