//! Automatic calling: one background task per room that appends a call on a
//! fixed interval until the game can no longer be called into.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::ai_dispatch;
use super::game_flow::{lifecycle_view, Caller, GameFlowService};
use crate::db::txn::with_txn;
use crate::domain::lifecycle::can_auto_call;
use crate::domain::CalledValue;
use crate::error::AppError;
use crate::repos::{calls, rooms};
use crate::state::app_state::AppState;

#[derive(Debug)]
struct Running {
    generation: u64,
    token: CancellationToken,
}

/// Registry of running automatic callers, keyed by room id.
#[derive(Debug, Clone, Default)]
pub struct AutoCallerRegistry {
    running: Arc<DashMap<i64, Running>>,
    generations: Arc<AtomicU64>,
}

enum Tick {
    Called(CalledValue),
    Finished,
}

impl AutoCallerRegistry {
    /// Start calling for `room_id`, replacing any caller already running
    /// for that room.
    pub fn start(&self, state: AppState, room_id: i64, interval: Duration) -> JoinHandle<()> {
        let generation = self.generations.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        if let Some(previous) = self.running.insert(
            room_id,
            Running {
                generation,
                token: token.clone(),
            },
        ) {
            previous.token.cancel();
        }
        info!(room_id, interval_ms = interval.as_millis() as u64, "Auto caller started");

        let registry = self.clone();
        tokio::spawn(async move {
            registry.run(state, room_id, interval, token).await;
            registry.deregister(room_id, generation);
        })
    }

    /// Returns true if a caller was running.
    pub fn stop(&self, room_id: i64) -> bool {
        match self.running.remove(&room_id) {
            Some((_, running)) => {
                running.token.cancel();
                info!(room_id, "Auto caller stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self, room_id: i64) -> bool {
        self.running.contains_key(&room_id)
    }

    /// Remove the entry only if it still belongs to the finishing task.
    fn deregister(&self, room_id: i64, generation: u64) {
        self.running
            .remove_if(&room_id, |_, running| running.generation == generation);
    }

    async fn run(&self, state: AppState, room_id: i64, interval: Duration, token: CancellationToken) {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately; the first call waits a full interval.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = ticker.tick() => {}
            }
            match tick(&state, room_id).await {
                Ok(Tick::Called(call)) => {
                    ai_dispatch::spawn_after_call(state.clone(), room_id, call);
                }
                Ok(Tick::Finished) => {
                    info!(room_id, "Auto caller finished; game can no longer be called");
                    return;
                }
                Err(e) if e.status().is_server_error() || e.is_retryable() => {
                    warn!(room_id, error = %e, "Auto call failed; will retry next tick");
                }
                Err(e) => {
                    warn!(room_id, error = %e, "Auto call rejected; stopping");
                    return;
                }
            }
        }
    }
}

async fn tick(state: &AppState, room_id: i64) -> Result<Tick, AppError> {
    let settings = state.settings.clone();
    let now = state.now();
    with_txn(state, move |txn| {
        Box::pin(async move {
            let room = rooms::require_room(txn, room_id).await?;
            let history = calls::load_history(txn, room.id).await?;
            let view = lifecycle_view(txn, &room, &history).await?;
            if !can_auto_call(&view, now, settings.fairness_window()) {
                debug!(room_id, "Auto call not allowed");
                return Ok(Tick::Finished);
            }
            let outcome = GameFlowService::new(settings)
                .append_call(txn, room_id, Caller::Auto, None, now)
                .await?;
            Ok(Tick::Called(outcome.call))
        })
    })
    .await
}
