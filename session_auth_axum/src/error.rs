use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::Serialize;

use session_auth::AuthError;

/// Standardized error body: a stable machine-readable code plus a
/// human-readable message. Internal details never leave the process.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                code: self.code,
                message: self.message,
            }),
        )
            .into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthorized => {
                Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", err.to_string())
            }
            AuthError::SessionExpired => {
                Self::new(StatusCode::UNAUTHORIZED, "SESSION_EXPIRED", err.to_string())
            }
            AuthError::InvalidCredentials => Self::new(
                StatusCode::UNAUTHORIZED,
                "INCORRECT_CREDENTIALS",
                err.to_string(),
            ),
            AuthError::UserAlreadyExists => Self::new(
                StatusCode::CONFLICT,
                "USER_ALREADY_EXISTS",
                err.to_string(),
            ),
            AuthError::UserNotFound => {
                Self::new(StatusCode::NOT_FOUND, "USER_NOT_FOUND", err.to_string())
            }
            AuthError::CsrfTokenMissing => Self::new(
                StatusCode::FORBIDDEN,
                "CSRF_TOKEN_MISSING",
                err.to_string(),
            ),
            AuthError::CsrfTokenMismatch => Self::new(
                StatusCode::FORBIDDEN,
                "CSRF_TOKEN_MISMATCH",
                err.to_string(),
            ),
            // A consistency bug between the stores; outwardly this is just
            // an unauthenticated request.
            AuthError::DataIntegrity(detail) => {
                tracing::error!(%detail, "Data integrity violation");
                Self::new(
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    "Not authenticated. Please log in.",
                )
            }
            AuthError::Session(e) => {
                tracing::error!(error = %e, "Session store failure");
                Self::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    "Service temporarily unavailable.",
                )
            }
            AuthError::User(e) => {
                tracing::error!(error = %e, "User store failure");
                Self::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    "Service temporarily unavailable.",
                )
            }
            AuthError::Password(e) => {
                tracing::error!(error = %e, "Password hashing failure");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error.",
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_credentials_maps_to_401() {
        let api_error = ApiError::from(AuthError::InvalidCredentials);
        assert_eq!(api_error.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(api_error.code(), "INCORRECT_CREDENTIALS");
    }

    #[test]
    fn test_user_already_exists_maps_to_409() {
        let api_error = ApiError::from(AuthError::UserAlreadyExists);
        assert_eq!(api_error.status(), StatusCode::CONFLICT);
        assert_eq!(api_error.code(), "USER_ALREADY_EXISTS");
    }

    #[test]
    fn test_session_expired_is_distinct_from_unauthorized() {
        let expired = ApiError::from(AuthError::SessionExpired);
        let unauthorized = ApiError::from(AuthError::Unauthorized);
        assert_eq!(expired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_ne!(expired.code(), unauthorized.code());
    }

    #[test]
    fn test_csrf_failures_map_to_403_with_distinct_codes() {
        let missing = ApiError::from(AuthError::CsrfTokenMissing);
        let mismatch = ApiError::from(AuthError::CsrfTokenMismatch);
        assert_eq!(missing.status(), StatusCode::FORBIDDEN);
        assert_eq!(mismatch.status(), StatusCode::FORBIDDEN);
        assert_ne!(missing.code(), mismatch.code());
    }

    #[test]
    fn test_data_integrity_is_reported_as_unauthorized() {
        let api_error = ApiError::from(AuthError::DataIntegrity("orphan".to_string()));
        assert_eq!(api_error.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(api_error.code(), "UNAUTHORIZED");
    }

    #[test]
    fn test_store_failure_hides_detail() {
        let api_error = ApiError::from(AuthError::Session(
            session_auth::SessionError::Storage("redis://secret-host refused".to_string()),
        ));
        assert_eq!(api_error.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(!api_error.message.contains("secret-host"));
    }
}
