//! Database connection and bootstrap.

use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{DatabaseConnection, SqlxPostgresConnector, SqlxSqliteConnector};
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{info, warn};

use crate::config::db::{db_url, DbKind};
use crate::error::AppError;

const SQLITE_BUSY_TIMEOUT_MS: u64 = 5000;
const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_RETRY_INTERVAL_MS: u64 = 500;

fn unavailable(what: &str, err: impl std::fmt::Display) -> AppError {
    AppError::DbUnavailable {
        detail: format!("{what}: {err}"),
    }
}

/// Retry a connection attempt with fixed interval delays.
/// Returns the error of the last attempt once all retries are exhausted.
async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt = 1;
    loop {
        match connect_fn().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(attempt, interval_ms, "connection_retry=success");
                }
                return Ok(result);
            }
            Err(e) if attempt < max_attempts => {
                warn!(attempt, max_attempts, interval_ms, error = %e, "connection_retry=failed");
                tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Per-connection session statements for the given engine.
fn session_statements(kind: DbKind) -> Vec<String> {
    match kind {
        DbKind::SqliteFile | DbKind::SqliteMemory => vec![
            "PRAGMA foreign_keys = ON;".to_string(),
            format!("PRAGMA busy_timeout = {SQLITE_BUSY_TIMEOUT_MS};"),
        ],
        DbKind::Postgres => vec![
            "SET application_name = 'bingo-backend';".to_string(),
            "SET timezone = 'UTC';".to_string(),
        ],
    }
}

async fn connect_sqlite(kind: DbKind, url: &str) -> Result<DatabaseConnection, AppError> {
    let options = SqliteConnectOptions::from_str(url)
        .map_err(|e| AppError::config(format!("invalid sqlite url: {e}")))?
        .create_if_missing(true);

    // Every connection to `sqlite::memory:` is its own database, so the
    // in-memory pool is pinned to one connection that never expires.
    let mut pool_options = SqlitePoolOptions::new().after_connect(|conn, _meta| {
        Box::pin(async move {
            for stmt in session_statements(DbKind::SqliteMemory) {
                sqlx::query(&stmt).execute(&mut *conn).await?;
            }
            Ok(())
        })
    });
    pool_options = match kind {
        DbKind::SqliteMemory => pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None),
        _ => pool_options.max_connections(5),
    };

    let pool = pool_options
        .connect_with(options)
        .await
        .map_err(|e| unavailable("sqlite connect failed", e))?;
    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

async fn connect_postgres(url: &str) -> Result<DatabaseConnection, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                for stmt in session_statements(DbKind::Postgres) {
                    sqlx::query(&stmt).execute(&mut *conn).await?;
                }
                Ok(())
            })
        })
        .connect(url)
        .await
        .map_err(|e| unavailable("postgres connect failed", e))?;
    Ok(SqlxPostgresConnector::from_sqlx_postgres_pool(pool))
}

/// Connect to the database for `kind`. Does NOT run migrations.
pub async fn connect_db(kind: DbKind) -> Result<DatabaseConnection, AppError> {
    let url = db_url(kind)?;
    let conn = match kind {
        DbKind::Postgres => {
            retry_connection(
                || connect_postgres(&url),
                CONNECT_ATTEMPTS,
                CONNECT_RETRY_INTERVAL_MS,
            )
            .await?
        }
        DbKind::SqliteFile | DbKind::SqliteMemory => connect_sqlite(kind, &url).await?,
    };
    info!(db_kind = %kind, "database connected");
    Ok(conn)
}

/// Connect and bring the schema up to date.
pub async fn bootstrap_db(kind: DbKind) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(kind).await?;
    migrate(&conn, MigrationCommand::Up).await?;
    Ok(conn)
}
