//! session-auth-axum - axum integration for the `session-auth` library.
//!
//! Provides the per-request session middleware (cookie resolution on the way
//! in, cookie set/refresh/clear policy on the way out), the `AuthUser`
//! extractor enforcing the CSRF double-submit check, the REST handlers for
//! register/login/logout/profile/health, and the error-to-response mapping.

mod error;
mod extract;
mod handlers;
mod middleware;
mod request_id;
mod router;
mod state;

pub use error::ApiError;
pub use extract::{AuthUser, SessionState};
pub use middleware::{SessionEstablished, SessionRevoked, session_middleware};
pub use request_id::{RequestId, request_id_middleware};
pub use router::session_auth_router;
pub use state::AppState;
