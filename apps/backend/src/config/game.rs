//! Game tuning read from the environment.

use std::env;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::error::AppError;

const MIN_AUTO_CALL_INTERVAL_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSettings {
    /// Length of the prize-splitting window after the first winning claim.
    pub fairness_window_secs: u64,
    pub max_players: u64,
    pub max_cards_per_player: u8,
    pub auto_call_interval_ms: u64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            fairness_window_secs: 10,
            max_players: 50,
            max_cards_per_player: 6,
            auto_call_interval_ms: 5000,
        }
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| {
            AppError::config(format!("Environment variable '{name}' has invalid value '{raw}'"))
        }),
        Err(_) => Ok(default),
    }
}

impl GameSettings {
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();
        let settings = Self {
            fairness_window_secs: parse_var("BINGO_FAIRNESS_WINDOW_SECS", defaults.fairness_window_secs)?,
            max_players: parse_var("BINGO_MAX_PLAYERS", defaults.max_players)?,
            max_cards_per_player: parse_var(
                "BINGO_MAX_CARDS_PER_PLAYER",
                defaults.max_cards_per_player,
            )?,
            auto_call_interval_ms: parse_var(
                "BINGO_AUTO_CALL_INTERVAL_MS",
                defaults.auto_call_interval_ms,
            )?,
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.fairness_window_secs == 0 {
            return Err(AppError::config("BINGO_FAIRNESS_WINDOW_SECS must be positive"));
        }
        if self.max_players == 0 {
            return Err(AppError::config("BINGO_MAX_PLAYERS must be positive"));
        }
        if self.max_cards_per_player == 0 {
            return Err(AppError::config("BINGO_MAX_CARDS_PER_PLAYER must be positive"));
        }
        if self.auto_call_interval_ms < MIN_AUTO_CALL_INTERVAL_MS {
            return Err(AppError::config(format!(
                "BINGO_AUTO_CALL_INTERVAL_MS must be at least {MIN_AUTO_CALL_INTERVAL_MS}"
            )));
        }
        Ok(())
    }

    pub fn fairness_window(&self) -> time::Duration {
        time::Duration::seconds(i64::try_from(self.fairness_window_secs).unwrap_or(i64::MAX))
    }

    pub fn auto_call_interval(&self) -> StdDuration {
        StdDuration::from_millis(self.auto_call_interval_ms)
    }
}
