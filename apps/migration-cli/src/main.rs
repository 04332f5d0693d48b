use bingo_backend::config::db::DbKind;
use bingo_backend::infra::db::connect_db;
use clap::{Parser, ValueEnum};
use migration::{migrate, MigrationCommand};
use tracing::{error, info};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Command {
    Up,
    Down,
    Fresh,
    Reset,
    Refresh,
    Status,
}

impl From<Command> for MigrationCommand {
    fn from(command: Command) -> Self {
        match command {
            Command::Up => MigrationCommand::Up,
            Command::Down => MigrationCommand::Down,
            Command::Fresh => MigrationCommand::Fresh,
            Command::Reset => MigrationCommand::Reset,
            Command::Refresh => MigrationCommand::Refresh,
            Command::Status => MigrationCommand::Status,
        }
    }
}

/// In-memory SQLite is not offered: the schema would vanish with the process.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Db {
    Postgres,
    SqliteFile,
}

impl From<Db> for DbKind {
    fn from(db: Db) -> Self {
        match db {
            Db::Postgres => DbKind::Postgres,
            Db::SqliteFile => DbKind::SqliteFile,
        }
    }
}

#[derive(Parser)]
#[command(name = "migration-cli")]
#[command(about = "Bingo database migration tool")]
struct Args {
    /// Migration command to run
    #[arg(value_enum)]
    command: Command,

    /// Database engine; connection details come from the usual env vars
    #[arg(short, long, value_enum, default_value = "postgres")]
    db: Db,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_env_filter("migration=info,migration_cli=info,sqlx=warn")
        .init();

    let args = Args::parse();
    let kind = DbKind::from(args.db);

    let db = match connect_db(kind).await {
        Ok(db) => db,
        Err(e) => {
            error!(db = %kind, error = %e, "Could not connect");
            std::process::exit(1);
        }
    };

    if let Err(e) = migrate(&db, args.command.into()).await {
        error!(command = ?args.command, error = %e, "Migration failed");
        std::process::exit(1);
    }
    info!(command = ?args.command, db = %kind, "Migration finished");
}
