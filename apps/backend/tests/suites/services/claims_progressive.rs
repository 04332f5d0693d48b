//! Progressive rooms: stages are won in order, once each, with no split.

use bingo_backend::domain::{Pattern, RoomPhase};
use bingo_backend::error::AppError;
use bingo_backend::errors::ErrorCode;
use bingo_backend::services::game_flow::Caller;
use time::Duration;

use crate::support::factory::{
    call, call_cells, claim, claim_req, mark_cells, progressive, snapshot, table, CORNERS,
};

const MAIN_DIAGONAL: [u8; 4] = [0, 6, 18, 24];

#[tokio::test]
async fn stages_are_awarded_in_order_until_complete() -> Result<(), AppError> {
    let t = table(progressive(&[Pattern::FourCorners, Pattern::Diagonal])).await;
    assert_eq!(t.host.room.prize_value, 125 + 100);
    let (host, card) = (t.host_id(), t.host_card());

    call_cells(&t.state, t.room_id, host, card, &CORNERS).await?;
    mark_cells(&t.state, t.room_id, host, card.card.id, &CORNERS).await?;
    let first = claim(&t.state, t.room_id, claim_req(host, card.card.id)).await?;
    assert_eq!(first.stage_position, Some(0));
    assert_eq!(first.record.pattern, Pattern::FourCorners);
    assert_eq!(first.record.prize_amount, 125);
    assert!(first.split.is_none());
    assert!(!first.game_over);

    // Calling continues between stages.
    call_cells(&t.state, t.room_id, host, card, &MAIN_DIAGONAL).await?;
    mark_cells(&t.state, t.room_id, host, card.card.id, &MAIN_DIAGONAL).await?;
    t.clock.advance(Duration::minutes(1));
    let second = claim(&t.state, t.room_id, claim_req(host, card.card.id)).await?;
    assert_eq!(second.stage_position, Some(1));
    assert_eq!(second.record.pattern, Pattern::Diagonal);
    assert!(second.game_over);

    let snap = snapshot(&t.state, t.room_id).await?;
    assert_eq!(snap.phase, RoomPhase::Resolved);
    assert_eq!(snap.room.winner_player_id, Some(host));
    let stages = snap.stages.expect("progressive snapshot lists stages");
    assert!(stages.iter().all(|s| s.claimed_by == Some(host)));
    assert_eq!(snap.leaderboard[0].prize_total, 225);
    assert_eq!(snap.leaderboard[0].wins, 2);

    let err = call(&t.state, t.room_id, Caller::Auto, None).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::GameOver);
    Ok(())
}

#[tokio::test]
async fn a_claimed_stage_cannot_be_won_again() -> Result<(), AppError> {
    let t = table(progressive(&[Pattern::FourCorners, Pattern::Coverall])).await;
    for (player, card) in [(t.host_id(), t.host_card()), (t.guest_id(), t.guest_card())] {
        call_cells(&t.state, t.room_id, t.host_id(), card, &CORNERS).await?;
        mark_cells(&t.state, t.room_id, player, card.card.id, &CORNERS).await?;
    }

    claim(&t.state, t.room_id, claim_req(t.host_id(), t.host_card().card.id)).await?;
    // Even inside what would be a single-mode fairness window.
    let err = claim(&t.state, t.room_id, claim_req(t.guest_id(), t.guest_card().card.id))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::PatternAlreadyWon);

    let snap = snapshot(&t.state, t.room_id).await?;
    assert_eq!(snap.winners.len(), 1);
    assert_eq!(snap.phase, RoomPhase::Calling);
    Ok(())
}

#[tokio::test]
async fn one_claim_consumes_one_stage() -> Result<(), AppError> {
    let t = table(progressive(&[Pattern::FourCorners, Pattern::Diagonal])).await;
    let (guest, card) = (t.guest_id(), t.guest_card());
    let both: Vec<u8> = CORNERS.iter().chain(MAIN_DIAGONAL.iter()).copied().collect();
    call_cells(&t.state, t.room_id, t.host_id(), card, &both).await?;
    mark_cells(&t.state, t.room_id, guest, card.card.id, &both).await?;

    let first = claim(&t.state, t.room_id, claim_req(guest, card.card.id)).await?;
    assert_eq!(first.stage_position, Some(0));
    let second = claim(&t.state, t.room_id, claim_req(guest, card.card.id)).await?;
    assert_eq!(second.stage_position, Some(1));
    assert!(second.game_over);
    Ok(())
}

#[tokio::test]
async fn marks_matching_no_stage_are_rejected() -> Result<(), AppError> {
    let t = table(progressive(&[Pattern::FourCorners, Pattern::Diagonal])).await;
    let err = claim(&t.state, t.room_id, claim_req(t.guest_id(), t.guest_card().card.id))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NoWinningPattern);
    Ok(())
}
