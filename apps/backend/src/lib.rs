#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod http;
pub mod middleware;
pub mod protocol;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod trace_ctx;

// Re-exports for public API
pub use client::{ClientSyncLoop, DisconnectSentinel, GameApi, HttpGameApi, InProcessGameApi};
pub use config::server::ServerConfig;
pub use error::AppError;
pub use middleware::cors::cors_middleware;
pub use middleware::request_trace::RequestTrace;
pub use services::{GameFlowOutcome, GameFlowService};
pub use state::app_state::AppState;
pub use store::{GameStore, MemoryGameStore};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::test_logging::init();
}
