//! Room setup helpers over an in-memory SQLite state with a manual clock.

use std::sync::Arc;

use bingo_backend::config::db::DbKind;
use bingo_backend::config::game::GameSettings;
use bingo_backend::db::txn::with_txn;
use bingo_backend::domain::{GameType, Pattern, RoomConfig, WinMode};
use bingo_backend::error::AppError;
use bingo_backend::infra::state::build_state;
use bingo_backend::repos::cards::CardRecord;
use bingo_backend::services::clock::ManualClock;
use bingo_backend::services::game_flow::{
    CallOutcome, Caller, ClaimOutcome, ClaimRequest, GameFlowService, MarkOutcome, RoomSnapshot,
};
use bingo_backend::services::rooms::{RoomService, Seated};
use bingo_backend::state::app_state::AppState;
use time::macros::datetime;
use time::OffsetDateTime;

pub const T0: OffsetDateTime = datetime!(2026-03-01 19:00 UTC);

pub const CORNERS: [u8; 4] = [0, 4, 20, 24];

pub async fn test_state() -> (AppState, ManualClock) {
    test_state_with(GameSettings::default()).await
}

pub async fn test_state_with(settings: GameSettings) -> (AppState, ManualClock) {
    let clock = ManualClock::new(T0);
    let state = build_state()
        .with_db(DbKind::SqliteMemory)
        .with_settings(settings)
        .with_clock(Arc::new(clock.clone()))
        .build()
        .await
        .expect("in-memory state");
    (state, clock)
}

pub fn single(pattern: Pattern) -> RoomConfig {
    RoomConfig::new(GameType::Numbers, WinMode::Single { pattern }, None).expect("valid config")
}

pub fn progressive(stages: &[Pattern]) -> RoomConfig {
    RoomConfig::new(
        GameType::Numbers,
        WinMode::Progressive {
            stages: stages.to_vec(),
        },
        None,
    )
    .expect("valid config")
}

pub async fn create_room(
    state: &AppState,
    host: &str,
    config: RoomConfig,
    cards: u8,
) -> Result<Seated, AppError> {
    let settings = state.settings.clone();
    let host = host.to_string();
    with_txn(state, move |txn| {
        Box::pin(async move {
            RoomService::new(settings)
                .create_room(txn, &host, &config, cards)
                .await
        })
    })
    .await
}

pub async fn join(
    state: &AppState,
    code: &str,
    name: &str,
    cards: u8,
    ai_kind: Option<&str>,
) -> Result<Seated, AppError> {
    let settings = state.settings.clone();
    let (code, name) = (code.to_string(), name.to_string());
    let ai_kind = ai_kind.map(str::to_string);
    with_txn(state, move |txn| {
        Box::pin(async move {
            RoomService::new(settings)
                .join_room(txn, &code, &name, cards, ai_kind.as_deref())
                .await
        })
    })
    .await
}

pub async fn call(
    state: &AppState,
    room_id: i64,
    caller: Caller,
    value: Option<&str>,
) -> Result<CallOutcome, AppError> {
    let settings = state.settings.clone();
    let now = state.now();
    let value = value.map(str::to_string);
    with_txn(state, move |txn| {
        Box::pin(async move {
            GameFlowService::new(settings)
                .append_call(txn, room_id, caller, value.as_deref(), now)
                .await
        })
    })
    .await
}

/// Label printed in `cell` of `record`. Panics on the free cell.
pub fn label(record: &CardRecord, cell: u8) -> String {
    record
        .card
        .layout()
        .cell(cell)
        .and_then(|c| c.label())
        .expect("cell holds a value")
        .to_string()
}

/// Host calls the values under `cells` of `record`.
pub async fn call_cells(
    state: &AppState,
    room_id: i64,
    host_id: i64,
    record: &CardRecord,
    cells: &[u8],
) -> Result<Vec<CallOutcome>, AppError> {
    let mut outcomes = Vec::with_capacity(cells.len());
    for &cell in cells {
        let value = label(record, cell);
        outcomes.push(call(state, room_id, Caller::Host(host_id), Some(&value)).await?);
    }
    Ok(outcomes)
}

pub async fn set_mark(
    state: &AppState,
    room_id: i64,
    player_id: i64,
    card_id: i64,
    cell: u8,
    marked: bool,
) -> Result<MarkOutcome, AppError> {
    let settings = state.settings.clone();
    with_txn(state, move |txn| {
        Box::pin(async move {
            GameFlowService::new(settings)
                .set_mark(txn, room_id, player_id, card_id, cell, marked)
                .await
        })
    })
    .await
}

pub async fn mark_cells(
    state: &AppState,
    room_id: i64,
    player_id: i64,
    card_id: i64,
    cells: &[u8],
) -> Result<(), AppError> {
    for &cell in cells {
        set_mark(state, room_id, player_id, card_id, cell, true).await?;
    }
    Ok(())
}

pub async fn claim(
    state: &AppState,
    room_id: i64,
    req: ClaimRequest,
) -> Result<ClaimOutcome, AppError> {
    let settings = state.settings.clone();
    let now = state.now();
    with_txn(state, move |txn| {
        Box::pin(async move {
            GameFlowService::new(settings)
                .submit_claim(txn, room_id, req, now)
                .await
        })
    })
    .await
}

/// Claim on `card_id` relying on the card's stored marks.
pub fn claim_req(player_id: i64, card_id: i64) -> ClaimRequest {
    ClaimRequest {
        player_id,
        card_id,
        ..ClaimRequest::default()
    }
}

pub async fn snapshot(state: &AppState, room_id: i64) -> Result<RoomSnapshot, AppError> {
    let settings = state.settings.clone();
    let now = state.now();
    with_txn(state, move |txn| {
        Box::pin(async move {
            GameFlowService::new(settings)
                .room_snapshot(txn, room_id, now)
                .await
        })
    })
    .await
}

/// Host and one guest, each with a single card, ready to call.
pub struct Table {
    pub state: AppState,
    pub clock: ManualClock,
    pub room_id: i64,
    pub room_code: String,
    pub host: Seated,
    pub guest: Seated,
}

impl Table {
    pub fn host_id(&self) -> i64 {
        self.host.player.id
    }

    pub fn guest_id(&self) -> i64 {
        self.guest.player.id
    }

    pub fn host_card(&self) -> &CardRecord {
        &self.host.cards[0]
    }

    pub fn guest_card(&self) -> &CardRecord {
        &self.guest.cards[0]
    }
}

pub async fn table(config: RoomConfig) -> Table {
    let (state, clock) = test_state().await;
    let host = create_room(&state, "Hana", config, 1).await.expect("create room");
    let guest = join(&state, &host.room.room_code, "Gus", 1, None)
        .await
        .expect("join room");
    Table {
        room_id: host.room.id,
        room_code: host.room.room_code.clone(),
        state,
        clock,
        host,
        guest,
    }
}
