use subtle::ConstantTimeEq;

use crate::session::errors::SessionError;
use crate::utils::gen_random_string;

/// Generate a CSRF token: 32 bytes (256 bits) from the system CSPRNG,
/// base64url-encoded.
pub fn generate_csrf_token() -> Result<String, SessionError> {
    Ok(gen_random_string(32)?)
}

/// Validate a received CSRF token against the session's token.
///
/// The comparison runs in constant time over the token contents, so the
/// position of the first differing byte is not observable. Empty inputs are
/// rejected outright; this function never fails.
pub fn validate_csrf_token(expected: &str, received: &str) -> bool {
    if expected.is_empty() || received.is_empty() {
        tracing::warn!("CSRF validation failed: missing expected or received token");
        return false;
    }

    let is_valid: bool = expected.as_bytes().ct_eq(received.as_bytes()).into();

    if !is_valid {
        tracing::warn!("CSRF validation failed: token mismatch");
    }

    is_valid
}
