use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A registered user account.
///
/// The password digest is a PHC-format string and is never serialized into
/// API responses.
#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct User {
    /// Unique user identifier (UUID text)
    pub id: String,
    /// Login name, unique across the system
    pub username: String,
    /// Email address, unique across the system
    pub email: String,
    /// Argon2 password digest
    #[serde(skip_serializing)]
    pub password_digest: String,
    /// When the account was created
    pub created_at: DateTime<Utc>,
    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh random id and current timestamps.
    pub fn new(username: String, email: String, password_digest: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            username,
            email,
            password_digest,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_user_new() {
        let user = User::new(
            "alice".to_string(),
            "alice@example.com".to_string(),
            "$argon2id$stub".to_string(),
        );

        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "alice@example.com");
        assert!(Uuid::parse_str(&user.id).is_ok());
        assert_eq!(user.created_at, user.updated_at);

        let one_second_ago = Utc::now() - Duration::seconds(1);
        assert!(user.created_at > one_second_ago);
    }

    #[test]
    fn test_user_ids_are_unique() {
        let a = User::new(
            "a".to_string(),
            "a@example.com".to_string(),
            "digest".to_string(),
        );
        let b = User::new(
            "b".to_string(),
            "b@example.com".to_string(),
            "digest".to_string(),
        );
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_password_digest_not_serialized() {
        let user = User::new(
            "alice".to_string(),
            "alice@example.com".to_string(),
            "super-secret-digest".to_string(),
        );
        let json = serde_json::to_string(&user).expect("Failed to serialize User");
        assert!(!json.contains("super-secret-digest"));
        assert!(!json.contains("password_digest"));
        assert!(json.contains("\"username\":\"alice\""));
    }
}
