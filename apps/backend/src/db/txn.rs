use futures_util::future::BoxFuture;
use sea_orm::{DatabaseTransaction, TransactionTrait};
use tracing::{debug, warn};

use super::require_db;
use crate::error::AppError;
use crate::state::app_state::AppState;

/// Execute a function within a database transaction.
///
/// Commits when the closure returns `Ok`. On `Err` the transaction is rolled
/// back (best effort) and the original error is returned, so a failed
/// operation never leaves partial writes behind.
///
/// ```ignore
/// let room = with_txn(&state, |txn| {
///     Box::pin(async move { Ok(repos::rooms::require_room(txn, room_id).await?) })
/// })
/// .await?;
/// ```
pub async fn with_txn<R, F>(state: &AppState, f: F) -> Result<R, AppError>
where
    R: Send,
    F: for<'a> FnOnce(&'a DatabaseTransaction) -> BoxFuture<'a, Result<R, AppError>> + Send,
{
    let db = require_db(state)?;
    let txn = db.begin().await?;

    match f(&txn).await {
        Ok(val) => {
            txn.commit().await?;
            Ok(val)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                warn!(error = %rollback_err, "transaction rollback failed");
            }
            Err(err)
        }
    }
}

/// Run `f` in a fresh transaction up to `attempts` times, retrying while the
/// error is retryable (`OPTIMISTIC_LOCK`, a dropped connection).
///
/// Every attempt rolls back fully before the next one starts, so `f` must be
/// safe to run again from scratch.
pub async fn with_txn_retry<R, F>(state: &AppState, attempts: usize, mut f: F) -> Result<R, AppError>
where
    R: Send,
    F: for<'a> FnMut(&'a DatabaseTransaction) -> BoxFuture<'a, Result<R, AppError>> + Send,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match with_txn(state, &mut f).await {
            Err(e) if e.is_retryable() && attempt < attempts => {
                debug!(attempt, error = %e, "retrying transaction");
                attempt += 1;
            }
            result => return result,
        }
    }
}
