//! # Juicebox API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use api_server::config::AppConfig;
use api_server::handlers;
use api_server::observability::RequestIdMiddleware;
use api_server::state::AppState;
use api_server::telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Juicebox API Server on {}:{}",
        config.host,
        config.port
    );

    #[cfg(feature = "postgres")]
    let db = api_server::state::open_database(&config).await;

    #[cfg(feature = "postgres")]
    let state = match &db {
        Some(db) => AppState::postgres(&config, db),
        None => AppState::in_memory(&config),
    };

    #[cfg(not(feature = "postgres"))]
    let state = {
        if config.database.is_some() {
            tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
        }
        AppState::in_memory(&config)
    };

    tracing::info!(store = state.backend, "Application state initialized");

    let result = HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await;

    // The server has stopped accepting requests; drain the pool.
    #[cfg(feature = "postgres")]
    if let Some(db) = db {
        if let Err(e) = db.close().await {
            tracing::error!("Error closing database connections: {}", e);
        }
    }

    tracing::info!("Server stopped");
    result
}
