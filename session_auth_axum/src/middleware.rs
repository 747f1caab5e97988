use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::header::{COOKIE, HeaderMap, SET_COOKIE};
use uuid::Uuid;

use session_auth::{Session, SessionError, SessionLookup, clear_session_cookie, session_cookie};

use crate::extract::SessionState;
use crate::state::AppState;

/// Response-extension marker inserted by the login handler: a session was
/// created during this request and the response must carry its cookie.
#[derive(Clone, Debug)]
pub struct SessionEstablished(pub Session);

/// Response-extension marker inserted by the logout handler: the session was
/// deleted and the response must clear the cookie.
#[derive(Clone, Copy, Debug)]
pub struct SessionRevoked;

/// Per-request session boundary.
///
/// Inbound: reads the session cookie, resolves it through the session
/// manager (which renews the idle window on success) and attaches a typed
/// [`SessionState`] to the request extensions for handlers and extractors.
///
/// Outbound, by priority: an explicit logout clears the cookie; a session
/// newly created by the handler sets it; a resolved session refreshes it; a
/// presented-but-dead cookie is cleared so the browser stops resending it;
/// otherwise no cookie header is emitted. A store outage leaves the cookie
/// untouched (the request already failed closed as unauthenticated).
pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let config = state.auth.sessions().config().clone();

    let session_state = match session_id_from_headers(req.headers(), &config.cookie_name) {
        None => SessionState::Anonymous,
        Some(raw) => match Uuid::parse_str(raw) {
            // A value that is not a session identifier is treated the same
            // as no cookie at all.
            Err(_) => {
                tracing::debug!("Session cookie value is not a valid identifier");
                SessionState::Anonymous
            }
            Ok(session_id) => match state.auth.sessions().get_session(session_id).await {
                Ok(SessionLookup::Found(session)) => SessionState::Authenticated(session),
                Ok(SessionLookup::Absent) => SessionState::Invalid,
                Ok(SessionLookup::Expired) => SessionState::Expired,
                Err(e) => {
                    tracing::error!(%session_id, error = %e, "Session store unreachable; failing closed");
                    SessionState::Unavailable
                }
            },
        },
    };

    req.extensions_mut().insert(session_state.clone());

    let mut response = next.run(req).await;

    let cookie = if response.extensions().get::<SessionRevoked>().is_some() {
        clear_session_cookie(&config).map(Some)
    } else if let Some(SessionEstablished(session)) =
        response.extensions().get::<SessionEstablished>()
    {
        session_cookie(&config, session).map(Some)
    } else {
        match &session_state {
            SessionState::Authenticated(session) => session_cookie(&config, session).map(Some),
            SessionState::Invalid | SessionState::Expired => {
                tracing::debug!("Clearing dead session cookie");
                clear_session_cookie(&config).map(Some)
            }
            SessionState::Anonymous | SessionState::Unavailable => {
                Ok::<_, SessionError>(None)
            }
        }
    };

    match cookie {
        Ok(Some(value)) => {
            response.headers_mut().insert(SET_COOKIE, value);
        }
        Ok(None) => {}
        Err(e) => tracing::error!(error = %e, "Failed to build session cookie"),
    }

    response
}

fn session_id_from_headers<'a>(headers: &'a HeaderMap, cookie_name: &str) -> Option<&'a str> {
    let cookie_str = headers.get(COOKIE)?.to_str().ok()?;

    cookie_str.split(';').map(|s| s.trim()).find_map(|s| {
        let mut parts = s.splitn(2, '=');
        match (parts.next(), parts.next()) {
            (Some(k), Some(v)) if k == cookie_name => Some(v),
            _ => None,
        }
    })
}
