use std::sync::Arc;
use uuid::Uuid;

use crate::password::{hash_password, verify_password};
use crate::session::{Session, SessionManager, generate_csrf_token};
use crate::userdb::{User, UserDb};

use super::errors::AuthError;

/// Registration payload.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login payload. The identifier matches either username or email.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username_or_email: String,
    pub password: String,
}

/// Coordinates the user store, password hashing and the session manager
/// into the register/login/logout flows.
pub struct AuthService {
    users: Arc<UserDb>,
    sessions: Arc<SessionManager>,
}

impl AuthService {
    pub fn new(users: Arc<UserDb>, sessions: Arc<SessionManager>) -> Self {
        Self { users, sessions }
    }

    pub fn users(&self) -> &UserDb {
        &self.users
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Register a new user after checking username and email for conflicts.
    pub async fn register_user(&self, new_user: NewUser) -> Result<User, AuthError> {
        if self
            .users
            .get_user_by_username_or_email(&new_user.username)
            .await?
            .is_some()
        {
            tracing::warn!(username = %new_user.username, "Registration attempt with existing username");
            return Err(AuthError::UserAlreadyExists);
        }

        if self
            .users
            .get_user_by_username_or_email(&new_user.email)
            .await?
            .is_some()
        {
            tracing::warn!(email = %new_user.email, "Registration attempt with existing email");
            return Err(AuthError::UserAlreadyExists);
        }

        let digest = hash_password(&new_user.password)?;
        let user = self
            .users
            .create_user(User::new(new_user.username, new_user.email, digest))
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Authenticate credentials and create a fresh session with a fresh
    /// CSRF token. Each login creates its own session; concurrent sessions
    /// per user are permitted.
    ///
    /// A store failure while persisting the session propagates: login must
    /// report failure rather than issue a cookie for a session that was
    /// never durably stored.
    pub async fn login_user(&self, credentials: Credentials) -> Result<Session, AuthError> {
        let user = self
            .users
            .get_user_by_username_or_email(&credentials.username_or_email)
            .await?;

        // A verification error (e.g. malformed digest) counts as a failed
        // login, and the message never says whether identifier or password
        // was wrong.
        let verified = user.as_ref().is_some_and(|user| {
            verify_password(&credentials.password, &user.password_digest).unwrap_or(false)
        });
        let Some(user) = user else {
            tracing::warn!(identifier = %credentials.username_or_email, "Login failed: unknown identifier");
            return Err(AuthError::InvalidCredentials);
        };
        if !verified {
            tracing::warn!(user_id = %user.id, "Login failed: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let csrf_token = generate_csrf_token()?;
        let session = self.sessions.create_session(&user.id, &csrf_token).await?;

        tracing::info!(user_id = %user.id, session_id = %session.session_id, "User logged in");
        Ok(session)
    }

    /// Delete the session, logging the user out. Idempotent.
    pub async fn logout_user(&self, session_id: Uuid) -> Result<(), AuthError> {
        self.sessions.delete_session(session_id).await?;
        tracing::info!(%session_id, "User logged out");
        Ok(())
    }

    /// Resolve the user record behind a session.
    ///
    /// A session whose user has vanished from the user store is a
    /// consistency bug between the two stores: the orphaned session is
    /// force-deleted and the caller gets a data-integrity failure, which
    /// the HTTP boundary reports as unauthenticated.
    pub async fn user_for_session(&self, session: &Session) -> Result<User, AuthError> {
        match self.users.get_user_by_id(&session.user_id).await? {
            Some(user) => Ok(user),
            None => {
                tracing::error!(
                    session_id = %session.session_id,
                    user_id = %session.user_id,
                    "Session references a user missing from the user store; deleting orphaned session"
                );
                self.sessions.delete_session(session.session_id).await?;
                Err(AuthError::DataIntegrity(format!(
                    "session {} references missing user",
                    session.session_id
                )))
            }
        }
    }
}
