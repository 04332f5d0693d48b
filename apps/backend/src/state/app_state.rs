use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::game::GameSettings;
use crate::services::auto_caller::AutoCallerRegistry;
use crate::services::clock::{Clock, SystemClock};

/// Application state containing shared resources
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database connection (optional for test scenarios)
    pub db: Option<DatabaseConnection>,
    pub settings: GameSettings,
    pub clock: Arc<dyn Clock>,
    /// Running automatic callers, keyed by room id
    pub auto_callers: AutoCallerRegistry,
}

impl AppState {
    pub fn new(db: DatabaseConnection, settings: GameSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            db: Some(db),
            settings,
            clock,
            auto_callers: AutoCallerRegistry::default(),
        }
    }

    /// State without a database connection; every DB-backed operation
    /// fails with `DB_UNAVAILABLE`.
    pub fn without_db(settings: GameSettings) -> Self {
        Self {
            db: None,
            settings,
            clock: Arc::new(SystemClock),
            auto_callers: AutoCallerRegistry::default(),
        }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }

    pub fn now(&self) -> time::OffsetDateTime {
        self.clock.now()
    }
}
