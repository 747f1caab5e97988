use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use http::{HeaderName, HeaderValue, Method, header::CONTENT_TYPE};
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use session_auth::{
    AuthService, DataStore, SessionConfig, SessionManager, UserDb, connect_cache_store,
};
use session_auth_axum::{AppState, session_auth_router};

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        #[cfg(debug_assertions)]
        {
            "session_auth=debug,session_auth_axum=debug,demo_server=debug,info".into()
        }

        #[cfg(not(debug_assertions))]
        {
            "info".into()
        }
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = std::env::var("CORS_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000".to_string())
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let csrf_header = HeaderName::from_static("x-csrf-token");
    let request_id_header = HeaderName::from_static("x-request-id");

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, csrf_header.clone()])
        // The frontend must be able to read the CSRF token after login
        .expose_headers([csrf_header, request_id_header])
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install shutdown signal handler");
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_tracing();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());
    let cache_store_type =
        std::env::var("CACHE_STORE_TYPE").unwrap_or_else(|_| "memory".to_string());
    let cache_store_url = std::env::var("CACHE_STORE_URL").unwrap_or_default();
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);

    // Open both stores before serving; a store that cannot be reached at
    // startup fails the process rather than every request.
    tracing::info!("Connecting to user database");
    let data_store = DataStore::connect(&database_url).await?;
    let users = Arc::new(UserDb::new(data_store));
    users.init().await?;

    tracing::info!("Connecting to session store");
    let cache = connect_cache_store(&cache_store_type, &cache_store_url).await?;
    let sessions = Arc::new(SessionManager::new(cache, SessionConfig::from_env()));

    let auth = Arc::new(AuthService::new(users, sessions));
    let app = session_auth_router(AppState::new(auth)).layer(cors_layer());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
