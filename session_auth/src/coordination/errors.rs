use thiserror::Error;

use crate::password::PasswordError;
use crate::session::SessionError;
use crate::userdb::UserError;

/// Failure taxonomy for the authentication flows. Each variant maps to a
/// distinct outward signal at the HTTP boundary.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No resolvable session
    #[error("Not authenticated. Please log in.")]
    Unauthorized,

    /// A session existed but its absolute lifetime elapsed; distinct from
    /// `Unauthorized` so clients can prompt a re-login specifically
    #[error("Session has expired. Please log in again.")]
    SessionExpired,

    /// Wrong identifier or password; deliberately does not say which
    #[error("Invalid username/email or password.")]
    InvalidCredentials,

    #[error("Username or email already registered.")]
    UserAlreadyExists,

    #[error("User not found.")]
    UserNotFound,

    #[error("CSRF token is missing.")]
    CsrfTokenMissing,

    #[error("CSRF token validation failed.")]
    CsrfTokenMismatch,

    /// A session referenced a user that no longer exists; the orphaned
    /// session has been force-deleted
    #[error("Data integrity violation: {0}")]
    DataIntegrity(String),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("User store error: {0}")]
    User(#[from] UserError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),
}
