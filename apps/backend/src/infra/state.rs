use std::sync::Arc;

use crate::config::db::DbKind;
use crate::config::game::GameSettings;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::services::clock::{Clock, SystemClock};
use crate::state::app_state::AppState;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    db_kind: Option<DbKind>,
    settings: GameSettings,
    clock: Arc<dyn Clock>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            db_kind: None,
            settings: GameSettings::default(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_db(mut self, kind: DbKind) -> Self {
        self.db_kind = Some(kind);
        self
    }

    pub fn with_settings(mut self, settings: GameSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        match self.db_kind {
            Some(kind) => {
                // single entrypoint: connect + migrate
                let conn = bootstrap_db(kind).await?;
                Ok(AppState::new(conn, self.settings, self.clock))
            }
            None => {
                let mut state = AppState::without_db(self.settings);
                state.clock = self.clock;
                Ok(state)
            }
        }
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
