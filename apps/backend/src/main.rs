use actix_web::{web, App, HttpServer};
use backend::cors_middleware;
use backend::routes;
use backend::AppState;
use backend::RequestTrace;
use backend::ServerConfig;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: via compose env_file or docker run --env-file
    // - Local dev: source env files manually (e.g., set -a; . ./.env; set +a)
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid server configuration: {e}");
            std::process::exit(1);
        }
    };

    println!(
        "🚀 Starting Chromaloop backend on http://{}:{}",
        config.host, config.port
    );

    let data = web::Data::new(AppState::new());

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
