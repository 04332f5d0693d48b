//! Room lifecycle: derived phase plus the legality checks for calling,
//! automatic calling and host-only actions.

use serde::Serialize;
use time::{Duration, OffsetDateTime};

use super::patterns::Pattern;
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum RoomPhase {
    Waiting,
    Calling,
    ClaimWindowOpen {
        #[serde(with = "time::serde::rfc3339")]
        closes_at: OffsetDateTime,
    },
    Resolved,
}

/// Everything the lifecycle needs to know about a room, already loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleView {
    /// `None` in progressive mode.
    pub single_pattern: Option<Pattern>,
    pub calls_made: usize,
    pub pool_size: usize,
    pub window_opened_at: Option<OffsetDateTime>,
    pub winner_player_id: Option<i64>,
    pub progressive_complete: bool,
}

impl LifecycleView {
    pub fn is_progressive(&self) -> bool {
        self.single_pattern.is_none()
    }

    pub fn pool_exhausted(&self) -> bool {
        self.calls_made >= self.pool_size
    }

    /// Terminal winner set (single) or every stage claimed (progressive).
    pub fn is_game_over(&self) -> bool {
        if self.is_progressive() {
            self.progressive_complete
        } else {
            self.winner_player_id.is_some()
        }
    }
}

pub fn derive_phase(view: &LifecycleView, now: OffsetDateTime, window: Duration) -> RoomPhase {
    if view.is_progressive() {
        if view.progressive_complete {
            return RoomPhase::Resolved;
        }
        return if view.calls_made == 0 {
            RoomPhase::Waiting
        } else {
            RoomPhase::Calling
        };
    }
    match view.window_opened_at {
        Some(opened) if now < opened + window => RoomPhase::ClaimWindowOpen {
            closes_at: opened + window,
        },
        Some(_) => RoomPhase::Resolved,
        None if view.calls_made == 0 => RoomPhase::Waiting,
        None => RoomPhase::Calling,
    }
}

/// Calls may not be appended into a finished game or past the pool.
pub fn ensure_can_call(view: &LifecycleView) -> Result<(), DomainError> {
    if view.is_game_over() {
        return Err(DomainError::validation(
            ValidationKind::GameOver,
            "the game already has a winner; reset the room to play again",
        ));
    }
    if view.pool_exhausted() {
        return Err(DomainError::validation(
            ValidationKind::CallsExhausted,
            format!("all {} values have been called", view.pool_size),
        ));
    }
    Ok(())
}

/// The automatic caller additionally pauses while a claim window is open.
pub fn can_auto_call(view: &LifecycleView, now: OffsetDateTime, window: Duration) -> bool {
    ensure_can_call(view).is_ok()
        && !matches!(derive_phase(view, now, window), RoomPhase::ClaimWindowOpen { .. })
}

pub fn ensure_host(host_player_id: Option<i64>, actor: i64) -> Result<(), DomainError> {
    if host_player_id == Some(actor) {
        Ok(())
    } else {
        Err(DomainError::validation(
            ValidationKind::NotHost,
            format!("player {actor} is not the host of this room"),
        ))
    }
}
