use bingo_backend::domain::{Pattern, FREE_CELL};
use bingo_backend::error::AppError;
use bingo_backend::errors::ErrorCode;

use crate::support::factory::{call_cells, set_mark, single, table};

#[tokio::test]
async fn marks_report_whether_the_value_was_called() -> Result<(), AppError> {
    let t = table(single(Pattern::Straight)).await;
    let card = t.guest_card().card.id;
    call_cells(&t.state, t.room_id, t.host_id(), t.guest_card(), &[0]).await?;

    let called = set_mark(&t.state, t.room_id, t.guest_id(), card, 0, true).await?;
    assert!(called.called);
    assert!(called.marks.contains(0));

    // Speculative marks are stored but flagged.
    let speculative = set_mark(&t.state, t.room_id, t.guest_id(), card, 1, true).await?;
    assert!(!speculative.called);
    assert!(speculative.marks.contains(1));

    let cleared = set_mark(&t.state, t.room_id, t.guest_id(), card, 1, false).await?;
    assert!(!cleared.marks.contains(1));
    assert!(cleared.marks.contains(FREE_CELL));
    Ok(())
}

#[tokio::test]
async fn free_cell_is_always_marked() -> Result<(), AppError> {
    let t = table(single(Pattern::Straight)).await;
    let card = t.guest_card().card.id;

    let outcome = set_mark(&t.state, t.room_id, t.guest_id(), card, FREE_CELL, true).await?;
    assert!(outcome.called);

    let err = set_mark(&t.state, t.room_id, t.guest_id(), card, FREE_CELL, false)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::FreeCellImmutable);
    Ok(())
}

#[tokio::test]
async fn mark_rejections() -> Result<(), AppError> {
    let t = table(single(Pattern::Straight)).await;

    let err = set_mark(&t.state, t.room_id, t.guest_id(), t.guest_card().card.id, 25, true)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::CellOutOfRange);

    // Someone else's card.
    let err = set_mark(&t.state, t.room_id, t.guest_id(), t.host_card().card.id, 0, true)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::CardNotFound);
    Ok(())
}
