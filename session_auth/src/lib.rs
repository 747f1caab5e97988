//! session-auth - cookie-session authentication core
//!
//! This crate owns the session lifecycle (create, retrieve with sliding
//! idle-timeout renewal, delete), the CSRF double-submit token utility, the
//! cache store the sessions live in (in-memory or Redis), the user record
//! store (SQLite or PostgreSQL via sqlx) and the register/login/logout
//! coordination on top of them. HTTP framework integration lives in the
//! companion `session-auth-axum` crate.

mod coordination;
mod password;
mod session;
mod storage;
mod userdb;
mod utils;

pub use coordination::{AuthError, AuthService, Credentials, NewUser};
pub use password::{PasswordError, hash_password, verify_password};
pub use session::{
    SameSite, Session, SessionConfig, SessionError, SessionLookup, SessionManager,
    clear_session_cookie, generate_csrf_token, session_cookie, validate_csrf_token,
};
pub use storage::{CacheData, CacheStore, DataStore, InMemoryCacheStore, StorageError,
    connect_cache_store};
pub use userdb::{User, UserDb, UserError};
