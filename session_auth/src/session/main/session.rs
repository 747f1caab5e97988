use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::session::config::SessionConfig;
use crate::session::errors::SessionError;
use crate::session::types::{Session, SessionLookup};
use crate::storage::CacheStore;

const SESSION_CACHE_PREFIX: &str = "session";

/// Owns the session lifecycle: create, retrieve-with-renewal, delete.
///
/// The manager is the sole writer of session records. It holds an explicit
/// cache-store handle injected at construction; middleware and guards are
/// read-only consumers of the records it returns.
pub struct SessionManager {
    store: Arc<dyn CacheStore>,
    config: SessionConfig,
}

impl SessionManager {
    pub fn new(store: Arc<dyn CacheStore>, config: SessionConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Create a session for `user_id` and persist it with the idle-timeout
    /// TTL. One store write; a storage failure here must fail the caller's
    /// whole operation (a cookie must never be issued for an unstored
    /// session).
    pub async fn create_session(
        &self,
        user_id: &str,
        csrf_token: &str,
    ) -> Result<Session, SessionError> {
        let now = Utc::now();
        let session = Session {
            session_id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            csrf_token: csrf_token.to_string(),
            created_at: now,
            expires_at: now + Duration::seconds(self.config.absolute_timeout as i64),
            last_activity_at: now,
        };

        self.store
            .put_with_ttl(
                SESSION_CACHE_PREFIX,
                &session.session_id.to_string(),
                session.clone().into(),
                self.config.idle_timeout as usize,
            )
            .await?;

        tracing::info!(session_id = %session.session_id, user_id, "Session created");
        Ok(session)
    }

    /// Look up a session and, when it is still live, slide its idle window:
    /// bump `last_activity_at` and re-persist with a refreshed TTL.
    ///
    /// The absolute expiry is checked lazily here; a record past its
    /// `expires_at` (the store's idle TTL has not fired yet) is deleted and
    /// reported as [`SessionLookup::Expired`]. `expires_at` itself is never
    /// extended.
    ///
    /// The read-check-rewrite is not atomic across the two store calls.
    /// Concurrent retrievals of the same id may interleave; both rewrite a
    /// live record with a fresh TTL, so the race is a benign
    /// last-writer-wins on `last_activity_at`.
    ///
    /// `Err` means the store itself failed; callers on a request path should
    /// fail closed and treat the request as unauthenticated.
    pub async fn get_session(&self, session_id: Uuid) -> Result<SessionLookup, SessionError> {
        let key = session_id.to_string();

        let Some(cached) = self.store.get(SESSION_CACHE_PREFIX, &key).await? else {
            tracing::debug!(%session_id, "Session not found in store");
            return Ok(SessionLookup::Absent);
        };

        let mut session: Session = match cached.try_into() {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(%session_id, error = %e, "Discarding undecodable session record");
                return Ok(SessionLookup::Absent);
            }
        };

        let now = Utc::now();
        if session.expires_at < now {
            tracing::info!(%session_id, user_id = %session.user_id, "Session reached absolute expiry");
            self.delete_session(session_id).await?;
            return Ok(SessionLookup::Expired);
        }

        session.last_activity_at = now;
        self.store
            .put_with_ttl(
                SESSION_CACHE_PREFIX,
                &key,
                session.clone().into(),
                self.config.idle_timeout as usize,
            )
            .await?;

        tracing::debug!(%session_id, user_id = %session.user_id, "Session refreshed");
        Ok(SessionLookup::Found(session))
    }

    /// Liveness of the backing store, for health checks.
    pub async fn ping(&self) -> Result<(), SessionError> {
        self.store.init().await?;
        Ok(())
    }

    /// Remove a session from the store. Idempotent: deleting an absent id
    /// is not an error.
    pub async fn delete_session(&self, session_id: Uuid) -> Result<(), SessionError> {
        self.store
            .remove(SESSION_CACHE_PREFIX, &session_id.to_string())
            .await?;
        tracing::info!(%session_id, "Session deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{CacheStore as _, InMemoryCacheStore};
    use std::time::Duration as StdDuration;

    fn manager_with(idle_timeout: u64, absolute_timeout: u64) -> (SessionManager, Arc<InMemoryCacheStore>) {
        let store = Arc::new(InMemoryCacheStore::new());
        let config = SessionConfig {
            idle_timeout,
            absolute_timeout,
            ..SessionConfig::default()
        };
        (SessionManager::new(store.clone(), config), store)
    }

    #[tokio::test]
    async fn test_create_and_get_round_trip() {
        let (manager, _) = manager_with(60, 120);
        let session = manager.create_session("user-1", "csrf-token").await.unwrap();

        assert_eq!(session.user_id, "user-1");
        assert_eq!(session.csrf_token, "csrf-token");
        assert_eq!(session.created_at, session.last_activity_at);
        assert_eq!(
            session.expires_at,
            session.created_at + Duration::seconds(120)
        );

        match manager.get_session(session.session_id).await.unwrap() {
            SessionLookup::Found(found) => {
                assert_eq!(found.session_id, session.session_id);
                assert_eq!(found.user_id, "user-1");
                assert_eq!(found.csrf_token, "csrf-token");
                assert!(found.last_activity_at >= session.last_activity_at);
            }
            other => panic!("Expected Found, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_absent() {
        let (manager, _) = manager_with(60, 120);
        let lookup = manager.get_session(Uuid::new_v4()).await.unwrap();
        assert_eq!(lookup, SessionLookup::Absent);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (manager, _) = manager_with(60, 120);
        let session = manager.create_session("user-1", "token").await.unwrap();

        manager.delete_session(session.session_id).await.unwrap();
        // Second delete of the same id is a no-op, not an error
        manager.delete_session(session.session_id).await.unwrap();

        assert_eq!(
            manager.get_session(session.session_id).await.unwrap(),
            SessionLookup::Absent
        );
    }

    #[tokio::test]
    async fn test_renewal_does_not_extend_absolute_expiry() {
        let (manager, _) = manager_with(60, 120);
        let session = manager.create_session("user-1", "token").await.unwrap();

        let SessionLookup::Found(renewed) =
            manager.get_session(session.session_id).await.unwrap()
        else {
            panic!("Expected Found");
        };
        assert_eq!(renewed.expires_at, session.expires_at);
        assert_eq!(renewed.created_at, session.created_at);
    }

    #[tokio::test]
    async fn test_absolute_ceiling() {
        // Idle TTL (5s) outlives the absolute timeout (1s): the expiry must
        // still be enforced on read, and the record deleted.
        let (manager, _) = manager_with(5, 1);
        let session = manager.create_session("user-1", "token").await.unwrap();

        tokio::time::sleep(StdDuration::from_millis(1200)).await;

        assert_eq!(
            manager.get_session(session.session_id).await.unwrap(),
            SessionLookup::Expired
        );
        // The expired record is gone; a later read sees plain absence.
        assert_eq!(
            manager.get_session(session.session_id).await.unwrap(),
            SessionLookup::Absent
        );
    }

    #[tokio::test]
    async fn test_sliding_idle_window() {
        // Touched more often than the idle timeout, a session survives well
        // past a single idle interval.
        let (manager, _) = manager_with(1, 30);
        let session = manager.create_session("user-1", "token").await.unwrap();

        for _ in 0..3 {
            tokio::time::sleep(StdDuration::from_millis(600)).await;
            match manager.get_session(session.session_id).await.unwrap() {
                SessionLookup::Found(_) => {}
                other => panic!("Session should have slid, got {other:?}"),
            }
        }

        // Left untouched past the idle timeout, the store evicts it.
        tokio::time::sleep(StdDuration::from_millis(1300)).await;
        assert_eq!(
            manager.get_session(session.session_id).await.unwrap(),
            SessionLookup::Absent
        );
    }

    #[tokio::test]
    async fn test_record_is_stored_as_json_under_session_prefix() {
        let (manager, store) = manager_with(60, 120);
        let session = manager.create_session("user-1", "token").await.unwrap();

        let raw = store
            .get("session", &session.session_id.to_string())
            .await
            .unwrap()
            .expect("record should be in the store");
        let value: serde_json::Value = serde_json::from_str(&raw.value).unwrap();

        assert_eq!(value["user_id"], "user-1");
        assert_eq!(value["csrf_token"], "token");
        assert_eq!(value["session_id"], session.session_id.to_string());
    }

    #[tokio::test]
    async fn test_undecodable_record_is_absent() {
        use crate::storage::CacheData;

        let (manager, store) = manager_with(60, 120);
        let session_id = Uuid::new_v4();
        store
            .put_with_ttl(
                "session",
                &session_id.to_string(),
                CacheData {
                    value: "not a session".to_string(),
                },
                60,
            )
            .await
            .unwrap();

        assert_eq!(
            manager.get_session(session_id).await.unwrap(),
            SessionLookup::Absent
        );
    }

    #[tokio::test]
    async fn test_concurrent_retrievals_are_benign() {
        let (manager, _) = manager_with(60, 120);
        let manager = Arc::new(manager);
        let session = manager.create_session("user-1", "token").await.unwrap();

        let mut handles = vec![];
        for _ in 0..8 {
            let manager = Arc::clone(&manager);
            let id = session.session_id;
            handles.push(tokio::spawn(async move { manager.get_session(id).await }));
        }

        for handle in handles {
            match handle.await.unwrap().unwrap() {
                SessionLookup::Found(found) => assert_eq!(found.session_id, session.session_id),
                other => panic!("Expected Found, got {other:?}"),
            }
        }
    }
}
