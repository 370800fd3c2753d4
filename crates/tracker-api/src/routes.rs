//! Router setup with all API routes and middleware.
//!
//! Configures the axum Router with CORS, tracing, compression, body
//! limits, rate limiting, and all endpoint handlers.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use tracker_core::config::ServerConfig;
use tracker_core::{TrackerConfig, TrackerError};

use crate::handlers;
use crate::rate_limit::{rate_limit_middleware, RateLimiter};
use crate::state::AppState;

/// Allowed CORS origins: the configured list, or localhost on the server
/// port when none are configured. `"*"` is handled by the caller.
fn cors_origins(server: &ServerConfig) -> Vec<HeaderValue> {
    let origins = if server.cors_origins.is_empty() {
        vec![
            format!("http://127.0.0.1:{}", server.port),
            format!("http://localhost:{}", server.port),
        ]
    } else {
        server
            .cors_origins
            .iter()
            .filter(|o| o.as_str() != "*")
            .cloned()
            .collect()
    };

    origins
        .into_iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect()
}

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let server = &state.config.server;

    let allow_origin = if server.cors_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(cors_origins(server))
    };

    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::LOCATION]);

    let limiter = RateLimiter::new(server.requests_per_second);
    let body_limit = server.max_body_bytes;

    let mut api_routes = Router::new()
        .route(
            "/api/activities",
            get(handlers::list_activities).post(handlers::create_activity),
        )
        .route(
            "/api/activities/{id}",
            get(handlers::get_activity)
                .put(handlers::update_activity)
                .delete(handlers::delete_activity),
        );

    if state.config.plugin.enabled {
        api_routes = api_routes
            .route("/api/plugin/functions", get(handlers::list_functions))
            .route("/api/plugin/functions/{name}", post(handlers::invoke_function));
    } else {
        tracing::info!("Plugin routes disabled in config");
    }

    // Health stays reachable when the limit is hit.
    let rate_limited_routes = api_routes
        .layer(axum::middleware::from_fn(rate_limit_middleware))
        .layer(axum::Extension(limiter));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(rate_limited_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server on the configured address.
///
/// Runs until ctrl-c.
pub async fn start_server(config: &TrackerConfig, state: AppState) -> Result<(), TrackerError> {
    let addr = config.bind_addr();
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TrackerError::Api(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Starting API server on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| TrackerError::Api(format!("Server error: {}", e)))?;

    tracing::info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
