use actix_web::web;

pub mod games;
pub mod health;
pub mod rooms;

/// Configure application routes.
///
/// `main.rs` wires these under the full middleware stack; tests register
/// the same paths directly so endpoint behavior can be exercised without
/// the outer wrappers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check routes: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // Room lifecycle routes: /api/rooms/**
    cfg.service(web::scope("/api/rooms").configure(rooms::configure_routes));

    // Gameplay routes: /api/games/**
    cfg.service(web::scope("/api/games").configure(games::configure_routes));
}
