use crate::session::{errors::SessionError, types::Session};

use crate::storage::CacheData;

impl From<Session> for CacheData {
    fn from(data: Session) -> Self {
        Self {
            value: serde_json::to_string(&data).expect("Failed to serialize Session"),
        }
    }
}

impl TryFrom<CacheData> for Session {
    type Error = SessionError;

    fn try_from(data: CacheData) -> Result<Self, Self::Error> {
        serde_json::from_str(&data.value).map_err(|e| SessionError::Storage(e.to_string()))
    }
}
