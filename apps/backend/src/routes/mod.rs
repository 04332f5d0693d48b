use actix_web::web;

pub mod health;
pub mod rooms;

/// Register every route. Shared by `main.rs` and the HTTP tests, which wrap
/// it in their own middleware.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // /api/rooms/**
    cfg.service(web::scope("/api/rooms").configure(rooms::configure_routes));
}
