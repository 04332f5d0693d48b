//! SeaORM -> DomainError translation.
//!
//! Adapters return `sea_orm::DbErr`; repos and services convert with `?`
//! through the `From` impl below, and `DomainError` maps onward to
//! `AppError` at the HTTP boundary.

use tracing::{debug, error, warn};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::trace_ctx;

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// Extract `table.column` from SQLite "UNIQUE constraint failed: t.a, t.b".
///
/// Composite keys list several columns; the first one names the table.
fn extract_sqlite_table_columns(error_msg: &str) -> Option<&str> {
    const MARKER: &str = "UNIQUE constraint failed: ";
    let start = error_msg.find(MARKER)? + MARKER.len();
    let rest = &error_msg[start..];
    let end = rest.find(['\n', '"', ')']).unwrap_or(rest.len());
    Some(rest[..end].trim())
}

fn map_sqlite_unique(table_columns: &str) -> Option<(ConflictKind, &'static str)> {
    let table = table_columns.split('.').next()?;
    match table {
        "winners" => Some((
            ConflictKind::AlreadyClaimed,
            "Pattern already claimed by this player in this game",
        )),
        "rooms" if table_columns.contains("room_code") => {
            Some((ConflictKind::RoomCodeConflict, "Room code already exists"))
        }
        "calls" => Some((ConflictKind::DuplicateCall, "Value already called")),
        "players" if table_columns.contains("display_name") => Some((
            ConflictKind::DisplayNameTaken,
            "Display name already taken in this room",
        )),
        _ => None,
    }
}

fn map_postgres_unique(error_msg: &str) -> Option<(ConflictKind, &'static str)> {
    if error_msg.contains("ux_winners_room_game_player_type") {
        return Some((
            ConflictKind::AlreadyClaimed,
            "Pattern already claimed by this player in this game",
        ));
    }
    if error_msg.contains("rooms_room_code_key") || error_msg.contains("room_code") {
        return Some((ConflictKind::RoomCodeConflict, "Room code already exists"));
    }
    if error_msg.contains("ux_calls_room_seq") || error_msg.contains("ux_calls_room_value") {
        return Some((ConflictKind::DuplicateCall, "Value already called"));
    }
    if error_msg.contains("ux_players_room_display_name") {
        return Some((
            ConflictKind::DisplayNameTaken,
            "Display name already taken in this room",
        ));
    }
    None
}

/// Translate a `DbErr` into a `DomainError` with sanitized detail.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let error_msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        sea_orm::DbErr::RecordNotFound(msg) => {
            debug!(trace_id = %trace_id, raw_error = %msg, "Record not found");
            return DomainError::not_found(
                NotFoundKind::Other("Record".into()),
                "Record not found",
            );
        }
        sea_orm::DbErr::Custom(msg) if msg.starts_with("ROOM_NOT_FOUND:") => {
            let room_id = msg
                .strip_prefix("ROOM_NOT_FOUND:")
                .and_then(|s| s.parse::<i64>().ok());
            return match room_id {
                Some(room_id) => {
                    debug!(trace_id = %trace_id, room_id, "Room not found");
                    DomainError::not_found(NotFoundKind::Room, format!("Room {room_id} not found"))
                }
                None => DomainError::not_found(NotFoundKind::Room, "Room not found"),
            };
        }
        sea_orm::DbErr::Custom(msg) if msg.starts_with("OPTIMISTIC_LOCK:") => {
            #[derive(serde::Deserialize)]
            struct LockInfo {
                expected: i32,
                actual: i32,
            }

            let info = msg
                .strip_prefix("OPTIMISTIC_LOCK:")
                .and_then(|json| serde_json::from_str::<LockInfo>(json).ok());
            if let Some(info) = info {
                warn!(
                    trace_id = %trace_id,
                    expected = info.expected,
                    actual = info.actual,
                    "Optimistic lock conflict detected"
                );
                return DomainError::conflict(
                    ConflictKind::OptimisticLock,
                    format!(
                        "Room was modified concurrently (expected version {}, actual version {}). Please retry.",
                        info.expected, info.actual
                    ),
                );
            }
            warn!(trace_id = %trace_id, "Optimistic lock conflict detected (version info unavailable)");
            return DomainError::conflict(
                ConflictKind::OptimisticLock,
                "Room was modified by another transaction; please retry",
            );
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %error_msg, "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    if mentions_sqlstate(&error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
        || error_msg.contains("UNIQUE constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %error_msg, "Unique constraint violation");

        if let Some(table_columns) = extract_sqlite_table_columns(&error_msg) {
            if let Some((kind, detail)) = map_sqlite_unique(table_columns) {
                return DomainError::conflict(kind, detail);
            }
        }
        if let Some((kind, detail)) = map_postgres_unique(&error_msg) {
            return DomainError::conflict(kind, detail);
        }
        return DomainError::conflict(
            ConflictKind::Other("Unique".into()),
            "Unique constraint violation",
        );
    }

    if mentions_sqlstate(&error_msg, "23503") {
        warn!(trace_id = %trace_id, raw_error = %error_msg, "Foreign key constraint violation");
        return DomainError::validation_other("Foreign key constraint violation");
    }

    if error_msg.contains("timeout") || error_msg.contains("timed out") {
        warn!(trace_id = %trace_id, raw_error = %error_msg, "Database timeout");
        return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
    }

    error!(trace_id = %trace_id, raw_error = %error_msg, "Unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    )
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        map_db_err(e)
    }
}
