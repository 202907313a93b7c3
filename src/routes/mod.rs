use crate::docs::ApiDoc;
use crate::handlers::{diagnostics, health_check, ready_check};
use crate::config::Config;
use crate::state::AppState;
use crate::websocket::websocket_handler;
use axum::{http::{HeaderValue, Method}, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create API routes
pub fn create_api_routes(state: Arc<AppState>) -> Router {
    Router::<Arc<AppState>>::new()
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .route("/v1/diagnostics", get(diagnostics))
        .with_state(state)
}

/// Create the full application: websocket endpoint, API and Swagger UI
pub fn create_app(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);

    let app = Router::new()
        // Board synchronization
        .route("/ws", get(websocket_handler))
        .with_state(state.clone())
        // Mount API routes
        .nest("/api", create_api_routes(state))
        // Mount Swagger UI
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add tracing layer
        .layer(TraceLayer::new_for_http());

    match cors {
        Some(cors) => app.layer(cors),
        None => app,
    }
}

fn cors_layer(config: &Config) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = config
        .cors_origin_list()
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    if !origins.is_empty() {
        Some(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods([Method::GET]),
        )
    } else if config.is_development() {
        Some(CorsLayer::permissive())
    } else {
        None
    }
}
