//! # Stakeboard HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /api/users` - User directory
//! - `POST /api/users` - Register a user
//! - `POST /api/auth` - Check a password
//! - `GET /api/users/{username}/data` - Saved board
//! - `POST /api/users/{username}/data` - Replace saved board (password required)
//! - `GET /api/users/{username}/stats` - Aggregate statistics
//! - `GET /api/users/{username}/view` - Filtered, sorted item listing
//!
//! ## Security Configuration
//!
//! - `server.cors_origins` / `STAKEBOARD_CORS_ORIGINS`: comma-separated list of
//!   allowed origins, or "*" for all (default: localhost only)
//! - `server.rate_limit` / `STAKEBOARD_RATE_LIMIT`: requests per second
//!   (default: 100, 0 to disable)

mod handlers;
mod middleware;
mod types;

// Re-exports for integration tests (via `stakeboard::api::*`)
pub use handlers::{
    auth_handler, create_user_handler, get_data_handler, health_handler, list_users_handler,
    save_data_handler, stats_handler, view_handler,
};
pub use middleware::{SharedLimiter, build_limiter};
pub use types::{
    ApiError, AuthRequest, AuthResponse, BoardPayload, CreateUserRequest, CreateUserResponse,
    ErrorResponse, HealthResponse, SaveRequest, SuccessResponse, UserEntry, UsersResponse,
    ViewItem, ViewQuery, ViewResponse,
};

use crate::config::ServerConfig;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::get,
};
use stakeboard_core::{BoardConfig, BoardStore, Catalog, StakeError};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Request body limit (2 MB).
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state: the board store plus the catalog and board settings
/// every request is interpreted against.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<Box<dyn BoardStore>>>,
    pub catalog: Arc<Catalog>,
    pub board_config: BoardConfig,
}

impl AppState {
    #[must_use]
    pub fn new(store: Box<dyn BoardStore>, catalog: Catalog, board_config: BoardConfig) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            catalog: Arc::new(catalog),
            board_config,
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Origins allowed when nothing is configured.
const LOCAL_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:8080",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:8080",
];

/// Build the CORS layer from `cors_origins`.
///
/// `"*"` allows every origin. A comma-separated list allows those origins;
/// entries that are not valid header values are skipped. Unset, or a list
/// with nothing valid in it, falls back to `LOCAL_ORIGINS`.
fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    let configured = match origins.map(str::trim) {
        Some("*") => {
            tracing::warn!("CORS: Allowing ALL origins (cors_origins=*). This is insecure for production!");
            return CorsLayer::permissive();
        }
        Some(list) => parse_origins(list),
        None => Vec::new(),
    };

    if configured.is_empty() {
        tracing::info!("CORS: defaulting to localhost only");
        return restricted_cors(parse_origins(&LOCAL_ORIGINS.join(",")));
    }
    restricted_cors(configured)
}

fn parse_origins(list: &str) -> Vec<HeaderValue> {
    list.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                None
            }
        })
        .collect()
}

/// The board API only reads and posts JSON.
fn restricted_cors(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Rate Limiting (if enabled)
pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route(
            "/api/users",
            get(handlers::list_users_handler).post(handlers::create_user_handler),
        )
        .route("/api/auth", axum::routing::post(handlers::auth_handler))
        .route(
            "/api/users/{username}/data",
            get(handlers::get_data_handler).post(handlers::save_data_handler),
        )
        .route("/api/users/{username}/stats", get(handlers::stats_handler))
        .route("/api/users/{username}/view", get(handlers::view_handler));

    match build_limiter(server.rate_limit) {
        Some(limiter) => {
            tracing::info!("Rate limiting enabled: {} requests/second", server.rate_limit);
            router = router.layer(axum_middleware::from_fn_with_state(
                limiter,
                middleware::throttle,
            ));
        }
        None => tracing::info!("Rate limiting disabled"),
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer(server.cors_origins.as_deref()))
                .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server and run until Ctrl+C.
pub async fn run_server(state: AppState, server: &ServerConfig) -> Result<(), StakeError> {
    let addr = format!("{}:{}", server.host, server.port);
    let router = create_router(state, server);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| StakeError::StorageFailure(format!("Bind failed: {}", e)))?;

    tracing::info!("Stakeboard HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StakeError::StorageFailure(format!("Server error: {}", e)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_list_skips_blank_and_invalid_entries() {
        let parsed = parse_origins("https://a.example, ,bad\norigin,https://b.example");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0], "https://a.example");
    }

    #[test]
    fn local_origins_all_parse() {
        assert_eq!(parse_origins(&LOCAL_ORIGINS.join(",")).len(), LOCAL_ORIGINS.len());
    }
}
