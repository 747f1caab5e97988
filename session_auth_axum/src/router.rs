use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::handlers::{health, login, logout, me, register};
use crate::middleware::session_middleware;
use crate::request_id::request_id_middleware;
use crate::state::AppState;

/// Build the service router with the session and request-id middleware
/// applied. The session middleware wraps every route, including `/health`.
pub fn session_auth_router(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/users/me", get(me))
        .route("/health", get(health))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
