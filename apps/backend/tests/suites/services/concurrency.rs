//! Version races between claims and calls, and recovery by retry.
//!
//! The in-memory pool has a single connection, so a race is staged by holding
//! on to a room read from before a rival write and replaying the conditional
//! update from it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bingo_backend::db::txn::{with_txn, with_txn_retry};
use bingo_backend::domain::Pattern;
use bingo_backend::error::AppError;
use bingo_backend::errors::ErrorCode;
use bingo_backend::repos::rooms::Room;
use bingo_backend::repos::{players, rooms, winners};
use bingo_backend::services::ai_dispatch;
use bingo_backend::services::game_flow::{Caller, ClaimRequest, GameFlowService};
use bingo_backend::state::app_state::AppState;

use crate::support::factory::{
    call, call_cells, claim, claim_req, mark_cells, single, snapshot, table, Table, CORNERS,
};

async fn load_room(state: &AppState, room_id: i64) -> Result<Room, AppError> {
    with_txn(state, move |txn| {
        Box::pin(async move { Ok(rooms::require_room(txn, room_id).await?) })
    })
    .await
}

async fn bump_from(state: &AppState, stale: Room) -> Result<Room, AppError> {
    with_txn(state, move |txn| {
        Box::pin(async move { Ok(rooms::bump_version(txn, &stale).await?) })
    })
    .await
}

async fn ready_corners(t: &Table) -> Result<(), AppError> {
    for (player, card) in [(t.host_id(), t.host_card()), (t.guest_id(), t.guest_card())] {
        call_cells(&t.state, t.room_id, t.host_id(), card, &CORNERS).await?;
        mark_cells(&t.state, t.room_id, player, card.card.id, &CORNERS).await?;
    }
    Ok(())
}

#[tokio::test]
async fn write_from_a_stale_room_loses_the_version_race() -> Result<(), AppError> {
    let t = table(single(Pattern::FourCorners)).await;
    ready_corners(&t).await?;
    let stale = load_room(&t.state, t.room_id).await?;

    claim(&t.state, t.room_id, claim_req(t.host_id(), t.host_card().card.id)).await?;

    let err = bump_from(&t.state, stale.clone()).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::OptimisticLock);
    assert_eq!(err.status().as_u16(), 409);
    assert!(err.is_retryable());

    let current = load_room(&t.state, t.room_id).await?;
    assert_eq!(current.version, stale.version + 1);
    Ok(())
}

#[tokio::test]
async fn appended_calls_take_the_room_version() -> Result<(), AppError> {
    let t = table(single(Pattern::FourCorners)).await;
    let host = Caller::Host(t.host_id());
    let before = load_room(&t.state, t.room_id).await?;

    call(&t.state, t.room_id, host, Some("B1")).await?;
    let after_call = load_room(&t.state, t.room_id).await?;
    assert_eq!(after_call.version, before.version + 1);

    let again = call(&t.state, t.room_id, host, Some("B1")).await?;
    assert!(!again.appended);
    assert_eq!(load_room(&t.state, t.room_id).await?.version, after_call.version);
    Ok(())
}

#[tokio::test]
async fn call_checked_before_a_winner_committed_cannot_land() -> Result<(), AppError> {
    let t = table(single(Pattern::FourCorners)).await;
    ready_corners(&t).await?;
    let called = snapshot(&t.state, t.room_id).await?.calls.len();
    // The call's legality check saw this room: no winner yet.
    let checked = load_room(&t.state, t.room_id).await?;
    assert_eq!(checked.winner_player_id, None);

    claim(&t.state, t.room_id, claim_req(t.host_id(), t.host_card().card.id)).await?;

    let err = bump_from(&t.state, checked).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::OptimisticLock);

    // Retrying the call against the committed room sees the winner.
    let err = call(&t.state, t.room_id, Caller::Auto, None).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::GameOver);
    let snap = snapshot(&t.state, t.room_id).await?;
    assert_eq!(snap.calls.len(), called);
    Ok(())
}

#[tokio::test]
async fn losing_claim_rolls_back_then_succeeds_on_retry() -> Result<(), AppError> {
    let t = table(single(Pattern::FourCorners)).await;
    ready_corners(&t).await?;
    let stale = load_room(&t.state, t.room_id).await?;
    claim(&t.state, t.room_id, claim_req(t.host_id(), t.host_card().card.id)).await?;

    let attempts = Arc::new(AtomicUsize::new(0));
    let settings = t.state.settings.clone();
    let now = t.state.now();
    let guest = t.guest_id();
    let req = claim_req(guest, t.guest_card().card.id);
    let room_id = t.room_id;

    let counter = attempts.clone();
    let outcome = with_txn_retry(&t.state, 3, move |txn| {
        let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
        let stale = stale.clone();
        let settings = settings.clone();
        let req = req.clone();
        Box::pin(async move {
            if attempt == 1 {
                // Ledger write made before the lost race must not survive.
                players::add_to_ledger(txn, guest, 1, 999).await?;
                rooms::bump_version(txn, &stale).await?;
            }
            GameFlowService::new(settings)
                .submit_claim(txn, room_id, req, now)
                .await
        })
    })
    .await?;

    assert_eq!(attempts.load(Ordering::SeqCst), 2);
    assert_eq!(outcome.record.prize_amount, 62);
    let snap = snapshot(&t.state, t.room_id).await?;
    let guest_row = snap
        .leaderboard
        .iter()
        .find(|e| e.player_id == guest)
        .expect("guest on leaderboard");
    assert_eq!((guest_row.wins, guest_row.prize_total), (1, 62));
    Ok(())
}

#[tokio::test]
async fn retry_gives_up_on_rejections_and_after_the_attempt_budget() -> Result<(), AppError> {
    let t = table(single(Pattern::FourCorners)).await;
    let stale = load_room(&t.state, t.room_id).await?;
    call(&t.state, t.room_id, Caller::Host(t.host_id()), Some("B1")).await?;

    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = attempts.clone();
    let err = with_txn_retry(&t.state, 3, move |txn| {
        counter.fetch_add(1, Ordering::SeqCst);
        let stale = stale.clone();
        Box::pin(async move { Ok(rooms::bump_version(txn, &stale).await?) })
    })
    .await
    .unwrap_err();
    assert_eq!(err.code(), ErrorCode::OptimisticLock);
    assert_eq!(attempts.load(Ordering::SeqCst), 3);

    // Not retryable: one attempt only.
    let attempts = Arc::new(AtomicUsize::new(0));
    let settings = t.state.settings.clone();
    let now = t.state.now();
    let room_id = t.room_id;
    let req = claim_req(t.guest_id(), t.guest_card().card.id);
    let counter = attempts.clone();
    let err = with_txn_retry(&t.state, 3, move |txn| {
        counter.fetch_add(1, Ordering::SeqCst);
        let settings = settings.clone();
        let req = req.clone();
        Box::pin(async move {
            GameFlowService::new(settings)
                .submit_claim(txn, room_id, req, now)
                .await
        })
    })
    .await
    .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NoWinningPattern);
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn split_correction_from_a_stale_amount_is_refused() -> Result<(), AppError> {
    let t = table(single(Pattern::FourCorners)).await;
    ready_corners(&t).await?;
    let won = claim(&t.state, t.room_id, claim_req(t.host_id(), t.host_card().card.id)).await?;
    let record_id = won.record.id;

    let applied = with_txn(&t.state, move |txn| {
        Box::pin(async move { Ok(winners::cas_prize_amount(txn, record_id, 100, 50).await?) })
    })
    .await?;
    assert!(!applied);
    let snap = snapshot(&t.state, t.room_id).await?;
    assert_eq!(snap.winners[0].prize_amount, 125);

    let applied = with_txn(&t.state, move |txn| {
        Box::pin(async move { Ok(winners::cas_prize_amount(txn, record_id, 125, 100).await?) })
    })
    .await?;
    assert!(applied);

    // A later split reads the re-priced record and corrects from it.
    let second = claim(&t.state, t.room_id, claim_req(t.guest_id(), t.guest_card().card.id)).await?;
    assert_eq!(second.record.prize_amount, 62);
    let snap = snapshot(&t.state, t.room_id).await?;
    assert!(snap.winners.iter().all(|w| w.prize_amount == 62));
    Ok(())
}

#[tokio::test]
async fn bot_claim_retry_replays_instead_of_double_awarding() -> Result<(), AppError> {
    let t = table(single(Pattern::FourCorners)).await;
    ready_corners(&t).await?;
    let req = ClaimRequest {
        claim_id: Some("bot-1-8-x".to_string()),
        ..claim_req(t.guest_id(), t.guest_card().card.id)
    };

    let first = ai_dispatch::claim(&t.state, t.room_id, req.clone()).await?;
    let again = ai_dispatch::claim(&t.state, t.room_id, req).await?;
    assert!(!first.replayed);
    assert!(again.replayed);
    assert_eq!(again.record, first.record);

    let snap = snapshot(&t.state, t.room_id).await?;
    let guest_row = snap
        .leaderboard
        .iter()
        .find(|e| e.player_id == t.guest_id())
        .expect("guest on leaderboard");
    assert_eq!((guest_row.wins, guest_row.prize_total), (1, 125));
    Ok(())
}
