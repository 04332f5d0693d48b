#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod ai;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod infra;
pub mod middleware;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
pub mod trace_ctx;
pub mod utils;

#[cfg(test)]
pub mod test_bootstrap;

pub use config::db::{db_url, DbKind};
pub use config::game::GameSettings;
pub use error::AppError;
pub use infra::db::{bootstrap_db, connect_db};
pub use infra::state::build_state;
pub use middleware::cors::cors_middleware;
pub use middleware::request_trace::RequestTrace;
pub use middleware::structured_logger::StructuredLogger;
pub use services::clock::{Clock, ManualClock, SystemClock};
pub use state::app_state::AppState;

#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
