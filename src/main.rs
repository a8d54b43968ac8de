//! Photo Tagger Backend
//!
//! Page-state service behind the "tag members in a photo" screen. Loads event
//! attendees from the backend REST API, enriches them with profile details and
//! submits the selected members as photo tags.

mod api;
mod auth;
mod config;
mod errors;
mod models;
mod tagging;
mod upstream;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use tagging::PageRegistry;
use upstream::HttpPhotoApi;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<PageRegistry>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Photo Tagger Backend");
    tracing::info!("Upstream API: {}", config.upstream_url);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if PSK is not configured
    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (TAGGER_API_PSK). Authentication is disabled!");
    }

    let api = HttpPhotoApi::new(
        &config.upstream_url,
        config.upstream_token.clone(),
        config.upstream_timeout,
    )?;
    let registry = Arc::new(PageRegistry::new(Arc::new(api), config.page_settings()));
    tagging::spawn_idle_sweeper(registry.clone(), config.page_ttl);

    // Create application state
    let state = AppState {
        registry,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone PSK for the auth layer
    let psk = state.config.api_psk.clone();

    // API routes
    let api_routes = Router::new()
        .route("/tag-pages", post(api::open_page))
        .route("/tag-pages/{id}", get(api::get_page))
        .route("/tag-pages/{id}", delete(api::close_page))
        .route("/tag-pages/{id}/search", put(api::search_page))
        .route("/tag-pages/{id}/load-more", post(api::load_more))
        .route(
            "/tag-pages/{id}/selection/{user_id}",
            post(api::toggle_selection),
        )
        .route("/tag-pages/{id}/submit", post(api::submit_tags))
        .route("/tag-pages/{id}/alerts", delete(api::dismiss_alerts))
        .route("/tag-pages/{id}/cancel", post(api::cancel_page))
        // Apply PSK auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
