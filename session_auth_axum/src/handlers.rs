use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use http::{StatusCode, header::HeaderValue};
use serde::{Deserialize, Serialize};

use session_auth::{Credentials, NewUser, User};

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::middleware::{SessionEstablished, SessionRevoked};
use crate::state::AppState;

const CSRF_HEADER: &str = "X-CSRF-Token";

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    pub username_or_email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

fn validation_error(message: &str) -> ApiError {
    ApiError::new(
        StatusCode::UNPROCESSABLE_ENTITY,
        "VALIDATION_ERROR",
        message,
    )
}

impl RegisterRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if self.username.len() < 3 || self.username.len() > 50 {
            return Err(validation_error(
                "Username must be between 3 and 50 characters.",
            ));
        }
        if !self.email.contains('@') {
            return Err(validation_error("Email address is not valid."));
        }
        if self.password.len() < 8 || self.password.len() > 64 {
            return Err(validation_error(
                "Password must be between 8 and 64 characters.",
            ));
        }
        Ok(())
    }
}

/// Register a new user with a unique username and email.
pub(crate) async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    body.validate()?;

    state
        .auth
        .register_user(NewUser {
            username: body.username,
            email: body.email,
            password: body.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully!",
        }),
    ))
}

/// Log in, establishing a session. The session id travels as an HttpOnly
/// cookie (set by the session middleware from the [`SessionEstablished`]
/// marker); the CSRF token is delivered in the `X-CSRF-Token` response
/// header since it is not embedded in the cookie.
pub(crate) async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let session = state
        .auth
        .login_user(Credentials {
            username_or_email: body.username_or_email,
            password: body.password,
        })
        .await?;

    let mut response = (
        StatusCode::OK,
        Json(MessageResponse {
            message: "Login successful!",
        }),
    )
        .into_response();

    match HeaderValue::from_str(&session.csrf_token) {
        Ok(value) => {
            response.headers_mut().insert(CSRF_HEADER, value);
        }
        Err(_) => tracing::error!("Failed to encode CSRF token header"),
    }
    response.extensions_mut().insert(SessionEstablished(session));

    Ok(response)
}

/// Log out the current user by deleting their session. Requires a valid
/// session cookie and CSRF token (enforced by the [`AuthUser`] extractor).
pub(crate) async fn logout(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Response, ApiError> {
    state.auth.logout_user(user.session.session_id).await?;

    let mut response = (
        StatusCode::OK,
        Json(MessageResponse {
            message: "Logged out successfully!",
        }),
    )
        .into_response();
    response.extensions_mut().insert(SessionRevoked);

    Ok(response)
}

/// Profile of the currently authenticated user.
pub(crate) async fn me(user: AuthUser) -> Json<UserResponse> {
    Json(user.user.into())
}

/// Liveness of the service and its collaborators: a trivial query against
/// the user database and a connection check against the session store.
pub(crate) async fn health(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, ApiError> {
    let unavailable = |e: String| {
        tracing::error!(error = %e, "Health check failed");
        ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "SERVICE_UNAVAILABLE",
            "Service temporarily unavailable.",
        )
    };

    state
        .auth
        .users()
        .ping()
        .await
        .map_err(|e| unavailable(e.to_string()))?;
    state
        .auth
        .sessions()
        .ping()
        .await
        .map_err(|e| unavailable(e.to_string()))?;

    Ok(Json(HealthResponse {
        status: "ok",
        message: "Service is healthy",
    }))
}
