use actix_web::{web, App, HttpServer};
use bingo_backend::config::db::DbKind;
use bingo_backend::config::game::GameSettings;
use bingo_backend::infra::state::build_state;
use bingo_backend::middleware::cors::cors_middleware;
use bingo_backend::middleware::request_trace::RequestTrace;
use bingo_backend::middleware::structured_logger::StructuredLogger;
use bingo_backend::routes;
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment comes from the runtime (docker env_file, or `set -a; . ./.env`).
    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = match std::env::var("BACKEND_PORT")
        .unwrap_or_else(|_| "3001".to_string())
        .parse::<u16>()
    {
        Ok(port) => port,
        Err(_) => {
            error!("BACKEND_PORT must be a valid port number");
            std::process::exit(1);
        }
    };

    let (db_kind, settings) = match DbKind::from_env().and_then(|kind| {
        GameSettings::from_env().map(|settings| (kind, settings))
    }) {
        Ok(loaded) => loaded,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let app_state = match build_state()
        .with_db(db_kind)
        .with_settings(settings)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "Failed to build application state");
            std::process::exit(1);
        }
    };
    info!(db = %db_kind, host = %host, port, "Bingo backend starting");

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
