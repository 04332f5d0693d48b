//! Game flow orchestration service - bridges pure domain logic with DB persistence.
//!
//! Each public method runs inside the caller's transaction and either applies
//! completely or returns an error, in which case the transaction is rolled
//! back by `with_txn`.

mod calling;
mod claims;
mod marking;
mod reset;
mod snapshot;

use sea_orm::ConnectionTrait;

pub use calling::{CallOutcome, Caller};
pub use claims::{ClaimOutcome, ClaimRequest, SplitSummary};
pub use marking::MarkOutcome;
pub use reset::ResetRequest;
pub use snapshot::{LeaderboardEntry, RoomSnapshot, RoomSummary};

use crate::config::game::GameSettings;
use crate::domain::{CallHistory, LifecycleView};
use crate::errors::domain::DomainError;
use crate::repos::rooms::Room;
use crate::repos::stages;

pub struct GameFlowService {
    settings: GameSettings,
}

impl GameFlowService {
    pub fn new(settings: GameSettings) -> Self {
        Self { settings }
    }

    fn fairness_window(&self) -> time::Duration {
        self.settings.fairness_window()
    }
}

/// Lifecycle inputs for `room`, given its already-loaded call history.
pub(crate) async fn lifecycle_view<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    room: &Room,
    history: &CallHistory,
) -> Result<LifecycleView, DomainError> {
    let progressive_complete = match room.mode.single_pattern() {
        Some(_) => false,
        None => stages::load_state(conn, room.id)
            .await?
            .is_some_and(|state| state.is_complete()),
    };
    Ok(LifecycleView {
        single_pattern: room.mode.single_pattern(),
        calls_made: history.len(),
        pool_size: room.game_type.pool_size(),
        window_opened_at: room.window_opened_at,
        winner_player_id: room.winner_player_id,
        progressive_complete,
    })
}
