//! Drives automated players after each call.
//!
//! Runs detached from the request that appended the call. Each bot action is
//! its own transaction through the same service methods a human request
//! uses; failures are logged and dropped.

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::game_flow::{ClaimOutcome, ClaimRequest, GameFlowService};
use crate::ai::create_ai;
use crate::db::txn::{with_txn, with_txn_retry};
use crate::domain::seed_derivation::derive_bot_seed;
use crate::domain::{CallHistory, CalledValue, Card, Pattern};
use crate::error::AppError;
use crate::repos::rooms::{Room, RoomMode};
use crate::repos::{calls, cards, players, rooms, stages};
use crate::state::app_state::AppState;

/// Tries per bot claim before giving up on it.
const CLAIM_ATTEMPTS: usize = 4;

struct BotCard {
    player_id: i64,
    ai_kind: String,
    card: Card,
}

struct Table {
    room: Room,
    history: CallHistory,
    claimable: Vec<Pattern>,
    bot_cards: Vec<BotCard>,
}

/// Let every bot in the room react to `call`.
pub fn spawn_after_call(state: AppState, room_id: i64, call: CalledValue) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = run_bots(&state, room_id, &call).await {
            warn!(room_id, seq = call.seq, error = %e, "Bot dispatch failed");
        }
    })
}

async fn load_table(state: &AppState, room_id: i64) -> Result<Table, AppError> {
    with_txn(state, move |txn| {
        Box::pin(async move {
            let room = rooms::require_room(txn, room_id).await?;
            let history = calls::load_history(txn, room.id).await?;
            let claimable = match room.mode {
                RoomMode::Single(pattern) => vec![pattern],
                RoomMode::Progressive => stages::load_state(txn, room.id)
                    .await?
                    .map(|state| {
                        state
                            .stages()
                            .iter()
                            .filter(|s| !s.is_claimed())
                            .map(|s| s.pattern)
                            .collect()
                    })
                    .unwrap_or_default(),
            };

            let mut bot_cards = Vec::new();
            for player in players::list_by_room(txn, room.id).await? {
                let Some(kind) = player.ai_kind else {
                    continue;
                };
                for record in cards::list_by_player(txn, player.id).await? {
                    bot_cards.push(BotCard {
                        player_id: player.id,
                        ai_kind: kind.clone(),
                        card: record.card,
                    });
                }
            }
            Ok(Table {
                room,
                history,
                claimable,
                bot_cards,
            })
        })
    })
    .await
}

async fn run_bots(state: &AppState, room_id: i64, call: &CalledValue) -> Result<(), AppError> {
    let table = load_table(state, room_id).await?;
    if table.bot_cards.is_empty() {
        return Ok(());
    }
    debug!(room_id, seq = call.seq, bots = table.bot_cards.len(), "Dispatching bots");

    for bot in table.bot_cards {
        let seed = derive_bot_seed(table.room.rng_seed, bot.player_id, table.room.game_no, call.seq);
        let strategy = create_ai(&bot.ai_kind, seed)?;
        let mut card = bot.card;

        for cell in strategy.decide_marks(&card, call).iter() {
            match mark(state, room_id, bot.player_id, card.id, cell).await {
                Ok(()) => {
                    card.mark(cell)?;
                }
                Err(e) => {
                    warn!(room_id, player_id = bot.player_id, card_id = card.id, cell, error = %e, "Bot mark failed");
                }
            }
        }

        if strategy.wants_claim(&card, &table.history, &table.claimable) {
            let req = ClaimRequest {
                player_id: bot.player_id,
                card_id: card.id,
                claim_id: Some(format!("bot-{}-{}-{}", table.room.game_no, call.seq, card.id)),
                ..ClaimRequest::default()
            };
            match claim(state, room_id, req).await {
                Ok(outcome) => debug!(
                    room_id,
                    player_id = bot.player_id,
                    card_id = card.id,
                    replayed = outcome.replayed,
                    "Bot claimed"
                ),
                Err(e) => {
                    warn!(room_id, player_id = bot.player_id, card_id = card.id, error = %e, "Bot claim failed");
                }
            }
        }
    }
    Ok(())
}

async fn mark(
    state: &AppState,
    room_id: i64,
    player_id: i64,
    card_id: i64,
    cell: u8,
) -> Result<(), AppError> {
    let settings = state.settings.clone();
    with_txn(state, move |txn| {
        Box::pin(async move {
            GameFlowService::new(settings)
                .set_mark(txn, room_id, player_id, card_id, cell, true)
                .await
                .map(|_| ())
        })
    })
    .await
}

/// A bot claim that loses a race for the room row is retried; the claim id
/// makes a retry after an unseen commit replay instead of double-award.
pub async fn claim(
    state: &AppState,
    room_id: i64,
    req: ClaimRequest,
) -> Result<ClaimOutcome, AppError> {
    let settings = state.settings.clone();
    let now = state.now();
    with_txn_retry(state, CLAIM_ATTEMPTS, move |txn| {
        let settings = settings.clone();
        let req = req.clone();
        Box::pin(async move {
            GameFlowService::new(settings)
                .submit_claim(txn, room_id, req, now)
                .await
        })
    })
    .await
}
