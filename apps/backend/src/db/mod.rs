pub mod txn;

use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::state::app_state::AppState;

/// Centralized helper to access the database connection from AppState.
///
/// Returns `AppError::DbUnavailable` when the state was built without a
/// database.
pub fn require_db(state: &AppState) -> Result<&DatabaseConnection, AppError> {
    state.db().ok_or_else(|| AppError::DbUnavailable {
        detail: "database is not configured".to_string(),
    })
}
