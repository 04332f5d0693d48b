//! DTOs for rooms_sea adapter.

use crate::entities::rooms::{RoomGameType, RoomWinMode};

/// DTO for creating a new room. The host is attached afterwards because
/// the host player row needs the room id first.
#[derive(Debug, Clone)]
pub struct RoomCreate {
    pub room_code: String,
    pub game_type: RoomGameType,
    pub win_mode: RoomWinMode,
    pub pattern: Option<String>,
    pub prize_value: i64,
    pub rng_seed: i64,
}

impl RoomCreate {
    pub fn new(room_code: impl Into<String>, game_type: RoomGameType, rng_seed: i64) -> Self {
        Self {
            room_code: room_code.into(),
            game_type,
            win_mode: RoomWinMode::Single,
            pattern: None,
            prize_value: 0,
            rng_seed,
        }
    }

    pub fn single(mut self, pattern: impl Into<String>, prize_value: i64) -> Self {
        self.win_mode = RoomWinMode::Single;
        self.pattern = Some(pattern.into());
        self.prize_value = prize_value;
        self
    }

    pub fn progressive(mut self, prize_value: i64) -> Self {
        self.win_mode = RoomWinMode::Progressive;
        self.pattern = None;
        self.prize_value = prize_value;
        self
    }
}

/// Host reset: advances the game, clears winner and window, optionally
/// switches the win configuration. Applied with an optimistic version check.
#[derive(Debug, Clone)]
pub struct RoomReset {
    pub id: i64,
    pub expected_version: i32,
    pub next_game_no: i32,
    /// `Some` replaces mode, pattern and prize together.
    pub config: Option<RoomResetConfig>,
}

#[derive(Debug, Clone)]
pub struct RoomResetConfig {
    pub win_mode: RoomWinMode,
    pub pattern: Option<String>,
    pub prize_value: i64,
}

impl RoomReset {
    pub fn new(id: i64, expected_version: i32, next_game_no: i32) -> Self {
        Self {
            id,
            expected_version,
            next_game_no,
            config: None,
        }
    }

    pub fn with_config(mut self, config: RoomResetConfig) -> Self {
        self.config = Some(config);
        self
    }
}
