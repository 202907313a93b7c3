mod models;
mod handlers;
mod routes;
mod docs;
mod board;
mod websocket;
mod config;
mod state;

use std::sync::Arc;
use routes::create_app;
use config::Config;
use state::AppState;
use tracing::{info, error, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use std::panic;

#[tokio::main(flavor = "current_thread")]
async fn main() {

    // Set panic hook for better error messages
    panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
    }));

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            // Default to info level, but allow debug for our app
            "colabri_board=debug,tower_http=debug,axum::rejection=trace,info".into()
        }))
        .init();

    info!("Starting server...");

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        warn!("Using default configuration");
        Config::default()
    });
    let address = config.server_address();

    // One board per process, shared by every connection
    let app_state = Arc::new(AppState::new(config));
    let app_routes = create_app(app_state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .unwrap_or_else(|_| panic!("Failed to bind to {}", address));

    info!("🚀 Server running on http://{}", address);
    info!("📡 WebSocket available at ws://{}/ws", address);
    info!("📚 Swagger UI available at http://{}/swagger", address);

    axum::serve(listener, app_routes)
        .await
        .expect("Server failed to start");
}
