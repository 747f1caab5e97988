use axum::extract::{FromRef, FromRequestParts, OptionalFromRequestParts};
use http::{Method, request::Parts};

use session_auth::{AuthError, Session, User, validate_csrf_token};

use crate::error::ApiError;
use crate::state::AppState;

const CSRF_HEADER: &str = "X-CSRF-Token";

/// Per-request session context, populated exactly once by the session
/// middleware and read-only thereafter.
#[derive(Clone, Debug)]
pub enum SessionState {
    /// No session cookie was presented (or its value was not a session id)
    Anonymous,
    /// A cookie was presented but no matching session exists in the store
    Invalid,
    /// A cookie was presented and the session's absolute lifetime elapsed
    Expired,
    /// The session store could not be reached; the request fails closed
    Unavailable,
    /// A live session, already renewed for this request
    Authenticated(Session),
}

impl SessionState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}

/// The authenticated user behind the request's session, available as an
/// extractor in route handlers.
///
/// Extraction requires the session middleware to have resolved a live
/// session. For state-changing methods (everything except GET/HEAD/OPTIONS)
/// it additionally enforces the CSRF double-submit check: the `X-CSRF-Token`
/// request header must equal the session's token under a constant-time
/// comparison. Safe methods bypass the token check entirely.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user: User,
    pub session: Session,
}

fn is_safe_method(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD || *method == Method::OPTIONS
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session_state = parts
            .extensions
            .get::<SessionState>()
            .cloned()
            .unwrap_or(SessionState::Anonymous);

        let session = match session_state {
            SessionState::Authenticated(session) => session,
            SessionState::Expired => return Err(AuthError::SessionExpired.into()),
            SessionState::Anonymous | SessionState::Invalid | SessionState::Unavailable => {
                return Err(AuthError::Unauthorized.into());
            }
        };

        if !is_safe_method(&parts.method) {
            let Some(received) = parts
                .headers
                .get(CSRF_HEADER)
                .and_then(|h| h.to_str().ok())
            else {
                tracing::warn!(
                    method = %parts.method,
                    uri = %parts.uri,
                    "CSRF token missing on state-changing request"
                );
                return Err(AuthError::CsrfTokenMissing.into());
            };

            if !validate_csrf_token(&session.csrf_token, received) {
                tracing::warn!(
                    method = %parts.method,
                    uri = %parts.uri,
                    user_id = %session.user_id,
                    "CSRF token mismatch"
                );
                return Err(AuthError::CsrfTokenMismatch.into());
            }
        }

        let app_state = AppState::from_ref(state);
        let user = app_state.auth.user_for_session(&session).await?;

        Ok(AuthUser { user, session })
    }
}

impl<S> OptionalFromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        let result: Result<Self, Self::Rejection> =
            <AuthUser as FromRequestParts<S>>::from_request_parts(parts, state).await;
        Ok(result.ok())
    }
}
