use std::sync::Arc;

use session_auth::AuthService;

/// Shared application state: the auth service owning the user store and the
/// session manager. Cheap to clone; handed to the router and middleware.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(auth: Arc<AuthService>) -> Self {
        Self { auth }
    }
}
