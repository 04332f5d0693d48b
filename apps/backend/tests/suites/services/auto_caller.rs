use std::time::Duration as StdDuration;

use bingo_backend::domain::Pattern;
use bingo_backend::error::AppError;
use tokio::time::{sleep, timeout};

use crate::support::factory::{
    call_cells, claim, claim_req, mark_cells, single, snapshot, table, CORNERS,
};

const TICK: StdDuration = StdDuration::from_millis(20);

async fn wait_for_calls(t: &crate::support::factory::Table, at_least: usize) -> usize {
    timeout(StdDuration::from_secs(5), async {
        loop {
            let calls = snapshot(&t.state, t.room_id)
                .await
                .expect("snapshot")
                .calls
                .len();
            if calls >= at_least {
                return calls;
            }
            sleep(TICK).await;
        }
    })
    .await
    .expect("auto caller made progress")
}

#[tokio::test]
async fn calls_on_an_interval_until_stopped() -> Result<(), AppError> {
    let t = table(single(Pattern::Coverall)).await;
    let registry = t.state.auto_callers.clone();

    let handle = registry.start(t.state.clone(), t.room_id, TICK);
    assert!(registry.is_running(t.room_id));
    wait_for_calls(&t, 3).await;

    assert!(registry.stop(t.room_id));
    assert!(!registry.stop(t.room_id), "second stop finds nothing");
    timeout(StdDuration::from_secs(1), handle)
        .await
        .expect("task ends after stop")
        .expect("task did not panic");

    let settled = snapshot(&t.state, t.room_id).await?.calls.len();
    sleep(TICK * 5).await;
    assert_eq!(snapshot(&t.state, t.room_id).await?.calls.len(), settled);
    Ok(())
}

#[tokio::test]
async fn stops_by_itself_once_the_game_is_over() -> Result<(), AppError> {
    let t = table(single(Pattern::FourCorners)).await;
    call_cells(&t.state, t.room_id, t.host_id(), t.host_card(), &CORNERS).await?;
    mark_cells(&t.state, t.room_id, t.host_id(), t.host_card().card.id, &CORNERS).await?;
    claim(&t.state, t.room_id, claim_req(t.host_id(), t.host_card().card.id)).await?;
    let calls = snapshot(&t.state, t.room_id).await?.calls.len();

    let registry = t.state.auto_callers.clone();
    let handle = registry.start(t.state.clone(), t.room_id, TICK);
    timeout(StdDuration::from_secs(2), handle)
        .await
        .expect("caller finished")
        .expect("task did not panic");

    assert!(!registry.is_running(t.room_id));
    assert_eq!(snapshot(&t.state, t.room_id).await?.calls.len(), calls);
    Ok(())
}

#[tokio::test]
async fn restarting_replaces_the_running_caller() -> Result<(), AppError> {
    let t = table(single(Pattern::Coverall)).await;
    let registry = t.state.auto_callers.clone();

    let first = registry.start(t.state.clone(), t.room_id, StdDuration::from_secs(60));
    let second = registry.start(t.state.clone(), t.room_id, TICK);
    timeout(StdDuration::from_secs(1), first)
        .await
        .expect("replaced caller exits")
        .expect("task did not panic");

    // The finished first task must not deregister its replacement.
    assert!(registry.is_running(t.room_id));
    wait_for_calls(&t, 2).await;

    registry.stop(t.room_id);
    timeout(StdDuration::from_secs(1), second)
        .await
        .expect("task ends after stop")
        .expect("task did not panic");
    Ok(())
}
