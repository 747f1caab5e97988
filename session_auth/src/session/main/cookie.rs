use chrono::{DateTime, Utc};
use http::header::HeaderValue;
use std::fmt::Write as _;

use crate::session::config::SessionConfig;
use crate::session::errors::SessionError;
use crate::session::types::Session;

/// Set-Cookie value carrying the session identifier.
///
/// `Max-Age` is the absolute timeout and `Expires` the session's absolute
/// expiry, so the browser drops the cookie no later than the server drops
/// the session.
pub fn session_cookie(
    config: &SessionConfig,
    session: &Session,
) -> Result<HeaderValue, SessionError> {
    build_cookie(
        config,
        &session.session_id.to_string(),
        config.absolute_timeout as i64,
        session.expires_at,
    )
}

/// Set-Cookie value that clears the session cookie: empty value, immediate
/// expiry, same path/domain attributes as at set-time.
pub fn clear_session_cookie(config: &SessionConfig) -> Result<HeaderValue, SessionError> {
    build_cookie(config, "", 0, DateTime::UNIX_EPOCH)
}

fn build_cookie(
    config: &SessionConfig,
    value: &str,
    max_age: i64,
    expires_at: DateTime<Utc>,
) -> Result<HeaderValue, SessionError> {
    let mut cookie = format!(
        "{name}={value}; Max-Age={max_age}; Expires={expires}; Path=/; SameSite={same_site}; HttpOnly",
        name = config.cookie_name,
        expires = expires_at.format("%a, %d %b %Y %H:%M:%S GMT"),
        same_site = config.cookie_same_site.as_str(),
    );
    if config.cookie_secure {
        cookie.push_str("; Secure");
    }
    if let Some(domain) = &config.cookie_domain {
        let _ = write!(cookie, "; Domain={domain}");
    }

    cookie
        .parse()
        .map_err(|_| SessionError::Cookie("Failed to parse cookie".to_string()))
}
