pub use sea_orm::{ConnectionTrait, DatabaseConnection};
pub use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Statement;

mod m20260101_000001_bingo; // keep filename + module name in sync

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20260101_000001_bingo::Migration)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationCommand {
    Up,
    Down,
    Fresh,
    Reset,
    Refresh,
    Status,
}

/// Run a migration command against an already-open connection.
///
/// Shared by the CLI and by application bootstrap so both paths log the
/// same before/after counters.
pub async fn migrate(db: &DatabaseConnection, command: MigrationCommand) -> Result<(), DbErr> {
    let before = db_diagnostics(db).await?;
    tracing::info!(
        ?command,
        backend = %before.backend,
        database = %before.name,
        defined = before.defined,
        applied = before.applied,
        "migration starting"
    );

    let result = match command {
        MigrationCommand::Up => Migrator::up(db, None).await,
        MigrationCommand::Down => Migrator::down(db, None).await,
        MigrationCommand::Fresh => Migrator::fresh(db).await,
        MigrationCommand::Reset => Migrator::reset(db).await,
        MigrationCommand::Refresh => Migrator::refresh(db).await,
        MigrationCommand::Status => Migrator::status(db).await,
    };

    match result {
        Ok(()) => {
            if command != MigrationCommand::Status {
                let after = db_diagnostics(db).await?;
                tracing::info!(?command, applied = after.applied, "migration finished");
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!(?command, backend = %before.backend, error = %e, "migration failed");
            Err(e)
        }
    }
}

#[derive(Debug)]
struct DbDiagnostics {
    backend: String,
    name: String,
    applied: usize,
    defined: usize,
}

async fn db_diagnostics(db: &DatabaseConnection) -> Result<DbDiagnostics, DbErr> {
    let backend = db.get_database_backend();
    let sql = match backend {
        sea_orm::DatabaseBackend::Postgres => Some("select current_database() as name"),
        sea_orm::DatabaseBackend::Sqlite => {
            Some("SELECT file AS name FROM pragma_database_list WHERE name = 'main'")
        }
        _ => None,
    };

    let name = match sql {
        Some(sql) => {
            let row = db
                .query_one(Statement::from_string(backend, sql.to_string()))
                .await?;
            match row.and_then(|r| r.try_get::<String>("", "name").ok()) {
                Some(file) if file.is_empty() => ":memory:".to_string(),
                Some(name) => name,
                None => "<unknown>".to_string(),
            }
        }
        None => "<unsupported>".to_string(),
    };

    Ok(DbDiagnostics {
        backend: format!("{backend:?}"),
        name,
        applied: count_applied_migrations(db).await.unwrap_or(0),
        defined: Migrator::migrations().len(),
    })
}

/// Number of applied migrations; 0 when the migration table does not exist yet.
pub async fn count_applied_migrations(db: &DatabaseConnection) -> Result<usize, DbErr> {
    match Migrator::get_applied_migrations(db).await {
        Ok(migrations) => Ok(migrations.len()),
        Err(DbErr::Exec(_)) => Ok(0),
        Err(e) => Err(e),
    }
}

/// Name of the latest applied migration, if any.
pub async fn get_latest_migration_version(db: &DatabaseConnection) -> Result<Option<String>, DbErr> {
    match Migrator::get_applied_migrations(db).await {
        Ok(migrations) => Ok(migrations.last().map(|m| m.name().to_string())),
        Err(DbErr::Exec(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
