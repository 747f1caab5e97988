use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Server-side session record, stored under key = `session_id` with the
/// store-native TTL set to the idle timeout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    /// Random identifier, generated at creation, also the store key and the
    /// cookie value
    pub session_id: Uuid,
    /// Owning user; must reference an existing user at creation time
    pub user_id: String,
    /// CSRF token bound to this session for its whole lifetime
    pub csrf_token: String,
    pub created_at: DateTime<Utc>,
    /// Absolute expiry (`created_at` + absolute timeout); never extended
    pub expires_at: DateTime<Utc>,
    /// Bumped on every successful retrieval
    pub last_activity_at: DateTime<Utc>,
}

/// Outcome of a session lookup.
///
/// Absence (store miss after idle eviction, or an unknown/forged id) and
/// absolute expiry are distinct conditions: clients may prompt a re-login
/// specifically for the latter.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionLookup {
    Found(Session),
    Absent,
    Expired,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session() -> Session {
        let now = Utc::now();
        Session {
            session_id: Uuid::new_v4(),
            user_id: "user-1".to_string(),
            csrf_token: "token".to_string(),
            created_at: now,
            expires_at: now + chrono::Duration::seconds(3600),
            last_activity_at: now,
        }
    }

    #[test]
    fn test_session_serde_round_trip() {
        let session = sample_session();
        let json = serde_json::to_string(&session).unwrap();
        let parsed: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, session);
    }

    #[test]
    fn test_session_wire_format_preserves_field_names() {
        let session = sample_session();
        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&session).unwrap()).unwrap();
        let object = value.as_object().unwrap();

        for field in [
            "session_id",
            "user_id",
            "csrf_token",
            "created_at",
            "expires_at",
            "last_activity_at",
        ] {
            assert!(object.contains_key(field), "missing field {field}");
        }
    }
}
