use bingo_backend::db::txn::with_txn;
use bingo_backend::domain::{Pattern, RoomPhase, WinMode, FREE_CELL};
use bingo_backend::error::AppError;
use bingo_backend::errors::ErrorCode;
use bingo_backend::repos::rooms::Room;
use bingo_backend::services::game_flow::{Caller, GameFlowService, ResetRequest};
use bingo_backend::state::app_state::AppState;

use crate::support::factory::{
    call, call_cells, claim, claim_req, mark_cells, single, snapshot, table, CORNERS,
};

async fn reset(
    state: &AppState,
    room_id: i64,
    actor: i64,
    config: Option<ResetRequest>,
) -> Result<Room, AppError> {
    let settings = state.settings.clone();
    with_txn(state, move |txn| {
        Box::pin(async move {
            GameFlowService::new(settings)
                .reset_room(txn, room_id, actor, config)
                .await
        })
    })
    .await
}

#[tokio::test]
async fn reset_starts_a_fresh_game_and_keeps_the_ledger() -> Result<(), AppError> {
    let t = table(single(Pattern::FourCorners)).await;
    let (host, card) = (t.host_id(), t.host_card());
    call_cells(&t.state, t.room_id, host, card, &CORNERS).await?;
    mark_cells(&t.state, t.room_id, host, card.card.id, &CORNERS).await?;
    claim(&t.state, t.room_id, claim_req(host, card.card.id)).await?;
    let before = snapshot(&t.state, t.room_id).await?;

    let room = reset(&t.state, t.room_id, host, None).await?;
    assert_eq!(room.game_no, before.room.game_no + 1);
    assert!(room.version > before.room.version);
    assert_eq!(room.winner_player_id, None);
    assert_eq!(room.window_opened_at, None);

    let after = snapshot(&t.state, t.room_id).await?;
    assert_eq!(after.phase, RoomPhase::Waiting);
    assert!(after.calls.is_empty());
    assert!(after.winners.is_empty(), "winners are listed for the current game only");
    assert_eq!(after.leaderboard[0].player_id, host);
    assert_eq!(after.leaderboard[0].prize_total, 125);

    // Marks are cleared down to the free cell; the layout is unchanged.
    let outcome = crate::support::factory::set_mark(
        &t.state, t.room_id, host, card.card.id, FREE_CELL, true,
    )
    .await?;
    assert_eq!(outcome.marks.to_vec(), vec![FREE_CELL]);

    // The new game can be called and won again.
    call(&t.state, t.room_id, Caller::Host(host), None).await?;
    Ok(())
}

#[tokio::test]
async fn reset_can_switch_the_win_mode() -> Result<(), AppError> {
    let t = table(single(Pattern::FourCorners)).await;
    let request = ResetRequest {
        win_mode: WinMode::Progressive {
            stages: vec![Pattern::FourCorners, Pattern::Coverall],
        },
        prize_override: None,
    };
    let room = reset(&t.state, t.room_id, t.host_id(), Some(request)).await?;
    assert_eq!(room.prize_value, 125 + 350);

    let snap = snapshot(&t.state, t.room_id).await?;
    assert!(snap.room.progressive);
    assert_eq!(snap.stages.map(|s| s.len()), Some(2));

    let back = ResetRequest {
        win_mode: WinMode::Single {
            pattern: Pattern::Straight,
        },
        prize_override: Some(500),
    };
    let room = reset(&t.state, t.room_id, t.host_id(), Some(back)).await?;
    assert_eq!(room.prize_value, 500);
    let snap = snapshot(&t.state, t.room_id).await?;
    assert_eq!(snap.room.pattern, Some(Pattern::Straight));
    assert!(snap.stages.is_none());
    Ok(())
}

#[tokio::test]
async fn only_the_host_resets() -> Result<(), AppError> {
    let t = table(single(Pattern::FourCorners)).await;
    call(&t.state, t.room_id, Caller::Host(t.host_id()), None).await?;

    let err = reset(&t.state, t.room_id, t.guest_id(), None).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotHost);

    let bad = ResetRequest {
        win_mode: WinMode::Single {
            pattern: Pattern::Straight,
        },
        prize_override: Some(0),
    };
    let err = reset(&t.state, t.room_id, t.host_id(), Some(bad)).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidPrize);

    let snap = snapshot(&t.state, t.room_id).await?;
    assert_eq!(snap.calls.len(), 1, "failed resets change nothing");
    Ok(())
}
