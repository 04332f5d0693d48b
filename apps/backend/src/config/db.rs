use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Which database engine backs the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    /// PostgreSQL (production)
    Postgres,
    /// SQLite file at `SQLITE_DB_PATH`
    SqliteFile,
    /// Private in-memory SQLite database (tests, demos)
    SqliteMemory,
}

impl DbKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            DbKind::Postgres => "postgres",
            DbKind::SqliteFile => "sqlite-file",
            DbKind::SqliteMemory => "sqlite-memory",
        }
    }

    pub fn is_sqlite(self) -> bool {
        matches!(self, DbKind::SqliteFile | DbKind::SqliteMemory)
    }

    /// `BINGO_DB_KIND`, defaulting to Postgres.
    pub fn from_env() -> Result<Self, AppError> {
        match env::var("BINGO_DB_KIND") {
            Ok(raw) => raw.parse(),
            Err(_) => Ok(DbKind::Postgres),
        }
    }
}

impl fmt::Display for DbKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DbKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(DbKind::Postgres),
            "sqlite-file" | "sqlite_file" | "sqlite" => Ok(DbKind::SqliteFile),
            "sqlite-memory" | "sqlite_memory" | "memory" => Ok(DbKind::SqliteMemory),
            other => Err(AppError::config(format!(
                "unknown database kind '{other}' (expected postgres, sqlite-file or sqlite-memory)"
            ))),
        }
    }
}

/// Builds a database URL from environment variables for the given kind
pub fn db_url(kind: DbKind) -> Result<String, AppError> {
    match kind {
        DbKind::Postgres => {
            let host = env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string());
            let port = env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".to_string());
            let db_name = must_var("BINGO_DB")?;
            let username = must_var("APP_DB_USER")?;
            let password = must_var("APP_DB_PASSWORD")?;
            Ok(format!(
                "postgresql://{username}:{password}@{host}:{port}/{db_name}"
            ))
        }
        DbKind::SqliteFile => {
            let path = must_var("SQLITE_DB_PATH")?;
            Ok(format!("sqlite://{path}"))
        }
        DbKind::SqliteMemory => Ok("sqlite::memory:".to_string()),
    }
}

/// Get required environment variable or return error
fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .map_err(|_| AppError::config(format!("Required environment variable '{name}' is not set")))
}
