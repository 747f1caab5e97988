mod cookie;
mod csrf;
mod session;

pub use cookie::{clear_session_cookie, session_cookie};
pub use csrf::{generate_csrf_token, validate_csrf_token};
pub use session::SessionManager;
