//! Single-pattern adjudication: validation, fairness window, prize split.

use bingo_backend::domain::{CellSet, Pattern};
use bingo_backend::error::AppError;
use bingo_backend::errors::ErrorCode;
use bingo_backend::services::game_flow::{ClaimRequest, LeaderboardEntry};
use time::Duration;

use crate::support::factory::{
    call_cells, claim, claim_req, join, mark_cells, single, snapshot, table, Table, CORNERS, T0,
};

async fn ready_corners(t: &Table) -> Result<(), AppError> {
    for (player, card) in [(t.host_id(), t.host_card()), (t.guest_id(), t.guest_card())] {
        call_cells(&t.state, t.room_id, t.host_id(), card, &CORNERS).await?;
        mark_cells(&t.state, t.room_id, player, card.card.id, &CORNERS).await?;
    }
    Ok(())
}

fn standing(board: &[LeaderboardEntry], player_id: i64) -> (i32, i64) {
    let entry = board
        .iter()
        .find(|e| e.player_id == player_id)
        .expect("player on leaderboard");
    (entry.wins, entry.prize_total)
}

#[tokio::test]
async fn lone_winner_takes_the_prize() -> Result<(), AppError> {
    let t = table(single(Pattern::FourCorners)).await;
    ready_corners(&t).await?;
    t.clock.advance(Duration::seconds(2));

    let outcome = claim(&t.state, t.room_id, claim_req(t.host_id(), t.host_card().card.id)).await?;
    assert!(!outcome.replayed);
    assert!(outcome.game_over);
    assert_eq!(outcome.record.pattern, Pattern::FourCorners);
    assert_eq!(outcome.record.prize_amount, 125);
    let split = outcome.split.expect("single mode reports the split");
    assert_eq!(split.winners, 1);
    assert_eq!(split.window_closes_at, T0 + Duration::seconds(12));

    let snap = snapshot(&t.state, t.room_id).await?;
    assert_eq!(snap.room.winner_player_id, Some(t.host_id()));
    assert_eq!(standing(&snap.leaderboard, t.host_id()), (1, 125));
    assert_eq!(standing(&snap.leaderboard, t.guest_id()), (0, 0));
    assert_eq!(snap.leaderboard[0].player_id, t.host_id());
    Ok(())
}

#[tokio::test]
async fn claims_inside_the_window_split_evenly() -> Result<(), AppError> {
    let t = table(single(Pattern::FourCorners)).await;
    ready_corners(&t).await?;

    t.clock.advance(Duration::seconds(1));
    claim(&t.state, t.room_id, claim_req(t.host_id(), t.host_card().card.id)).await?;
    t.clock.advance(Duration::seconds(4));
    let second = claim(&t.state, t.room_id, claim_req(t.guest_id(), t.guest_card().card.id)).await?;

    let split = second.split.expect("split summary");
    assert_eq!(split.winners, 2);
    assert_eq!(split.share, 62);
    assert_eq!(second.record.prize_amount, 62);

    let snap = snapshot(&t.state, t.room_id).await?;
    assert_eq!(snap.winners.len(), 2);
    assert!(snap.winners.iter().all(|w| w.prize_amount == 62));
    assert_eq!(standing(&snap.leaderboard, t.host_id()), (1, 62));
    assert_eq!(standing(&snap.leaderboard, t.guest_id()), (1, 62));
    // The first claimant keeps the room's winner slot.
    assert_eq!(snap.room.winner_player_id, Some(t.host_id()));
    Ok(())
}

#[tokio::test]
async fn window_is_half_open() -> Result<(), AppError> {
    let t = table(single(Pattern::FourCorners)).await;
    let late = join(&t.state, &t.room_code, "Ivy", 1, None).await?;
    let late_card = &late.cards[0];
    ready_corners(&t).await?;
    call_cells(&t.state, t.room_id, t.host_id(), late_card, &CORNERS).await?;
    mark_cells(&t.state, t.room_id, late.player.id, late_card.card.id, &CORNERS).await?;

    claim(&t.state, t.room_id, claim_req(t.host_id(), t.host_card().card.id)).await?;

    t.clock.advance(Duration::seconds(10) - Duration::milliseconds(1));
    claim(&t.state, t.room_id, claim_req(t.guest_id(), t.guest_card().card.id)).await?;

    t.clock.advance(Duration::milliseconds(1));
    let err = claim(&t.state, t.room_id, claim_req(late.player.id, late_card.card.id))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::PatternAlreadyWon);

    let snap = snapshot(&t.state, t.room_id).await?;
    assert_eq!(snap.winners.len(), 2);
    assert_eq!(standing(&snap.leaderboard, late.player.id), (0, 0));
    Ok(())
}

#[tokio::test]
async fn second_claim_by_the_same_player_is_rejected() -> Result<(), AppError> {
    let t = table(single(Pattern::FourCorners)).await;
    ready_corners(&t).await?;
    let req = claim_req(t.host_id(), t.host_card().card.id);
    claim(&t.state, t.room_id, req.clone()).await?;

    let err = claim(&t.state, t.room_id, req).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::AlreadyClaimed);

    let snap = snapshot(&t.state, t.room_id).await?;
    assert_eq!(standing(&snap.leaderboard, t.host_id()), (1, 125));
    Ok(())
}

#[tokio::test]
async fn retried_claim_id_replays_without_paying_twice() -> Result<(), AppError> {
    let t = table(single(Pattern::FourCorners)).await;
    ready_corners(&t).await?;
    let req = ClaimRequest {
        claim_id: Some("claim-7f3a".to_string()),
        ..claim_req(t.host_id(), t.host_card().card.id)
    };

    let first = claim(&t.state, t.room_id, req.clone()).await?;
    t.clock.advance(Duration::seconds(30));
    let retry = claim(&t.state, t.room_id, req).await?;

    assert!(retry.replayed);
    assert_eq!(retry.record, first.record);
    let snap = snapshot(&t.state, t.room_id).await?;
    assert_eq!(standing(&snap.leaderboard, t.host_id()), (1, 125));
    Ok(())
}

#[tokio::test]
async fn client_marks_are_checked_against_the_history() -> Result<(), AppError> {
    let t = table(single(Pattern::FourCorners)).await;
    let card = t.host_card();
    call_cells(&t.state, t.room_id, t.host_id(), card, &CORNERS[..3]).await?;
    let before = snapshot(&t.state, t.room_id).await?;

    let asserted = ClaimRequest {
        marks: Some(CellSet::from_indices(CORNERS)),
        ..claim_req(t.host_id(), card.card.id)
    };
    let err = claim(&t.state, t.room_id, asserted).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidClaim);
    assert!(err.detail().contains("[24]"), "{}", err.detail());

    // The rejected claim left nothing behind.
    let snap = snapshot(&t.state, t.room_id).await?;
    assert!(snap.winners.is_empty());
    assert_eq!(snap.room.version, before.room.version);

    call_cells(&t.state, t.room_id, t.host_id(), card, &CORNERS[3..]).await?;
    let outcome = claim(
        &t.state,
        t.room_id,
        ClaimRequest {
            marks: Some(CellSet::from_indices(CORNERS)),
            ..claim_req(t.host_id(), card.card.id)
        },
    )
    .await?;
    assert_eq!(outcome.record.card_id, card.card.id);
    Ok(())
}

#[tokio::test]
async fn incomplete_or_wrong_pattern_is_rejected() -> Result<(), AppError> {
    let t = table(single(Pattern::FourCorners)).await;
    let card = t.host_card();
    call_cells(&t.state, t.room_id, t.host_id(), card, &CORNERS[..3]).await?;
    mark_cells(&t.state, t.room_id, t.host_id(), card.card.id, &CORNERS[..3]).await?;

    let err = claim(&t.state, t.room_id, claim_req(t.host_id(), card.card.id))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NoWinningPattern);

    let wrong = ClaimRequest {
        pattern: Some(Pattern::Straight),
        ..claim_req(t.host_id(), card.card.id)
    };
    let err = claim(&t.state, t.room_id, wrong).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::PatternNotInPlay);

    let not_mine = claim_req(t.guest_id(), card.card.id);
    let err = claim(&t.state, t.room_id, not_mine).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::CardNotFound);
    Ok(())
}
