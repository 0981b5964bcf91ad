//! Personal Site Backend - library for app logic and testing

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod routes;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::db::{DocumentStore, MongoStore};
use crate::routes::AppState;

/// Fully open CORS: every origin, method and header is mirrored back, and
/// credentials are allowed.
pub fn configure_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Create and configure the application router.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::health::read_root))
        .route("/test", get(routes::health::test_database))
        .route("/health", get(routes::health::health_ping))
        .route(
            "/api/blogs",
            get(routes::blog::list_blogs).post(routes::blog::create_blog),
        )
        .route("/api/blogs/{slug_or_id}", get(routes::blog::get_blog))
        .route("/api/contact", post(routes::contact::submit_contact))
        .with_state(state)
        .layer(logging::middleware::propagate_request_id_layer())
        .layer(middleware::from_fn(logging::middleware::log_request))
        .layer(logging::middleware::request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        // Global 2 MB request body cap
        .layer(RequestBodyLimitLayer::new(2 * 1024 * 1024))
        .layer(configure_cors())
}

/// Open the shared store, or `None` when it is not configured or the
/// initial connection fails. Requests then fail individually on use.
pub async fn connect_store(config: &AppConfig) -> Option<Arc<dyn DocumentStore>> {
    let Some(db_config) = config.db_config() else {
        tracing::info!("DATABASE_URL or DATABASE_NAME not set. Running without database.");
        return None;
    };

    match MongoStore::connect(&db_config).await {
        Ok(store) => Some(Arc::new(store)),
        Err(e) => {
            tracing::warn!(
                "Failed to connect to database: {}. Continuing without database.",
                e
            );
            None
        }
    }
}

/// Run the server (used by main).
pub async fn run() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    // Dropping these early shuts down the background log writers.
    let _log_guards = logging::init(&logging::LogConfig::from_env());

    routes::health::init_start_time();

    let config = AppConfig::from_env();
    let store = connect_store(&config).await;
    let state = AppState::new(store, config.env_presence());

    let app = create_app(state);

    let addr: SocketAddr = config.bind_address().parse().map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid HOST/PORT {}: {}", config.bind_address(), e),
        )
    })?;
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}
