use crate::storage::DataStore;
use crate::userdb::{errors::UserError, types::User};

use super::postgres::*;
use super::sqlite::*;

/// User record store over an explicitly injected [`DataStore`] handle.
pub struct UserDb {
    store: DataStore,
}

impl UserDb {
    pub fn new(store: DataStore) -> Self {
        Self { store }
    }

    /// Initialize the user table for the active backend.
    pub async fn init(&self) -> Result<(), UserError> {
        match (self.store.as_sqlite(), self.store.as_postgres()) {
            (Some(pool), _) => create_tables_sqlite(pool).await,
            (_, Some(pool)) => create_tables_postgres(pool).await,
            _ => Err(UserError::Storage("Unsupported database type".to_string())),
        }
    }

    /// Liveness probe against the backing database.
    pub async fn ping(&self) -> Result<(), UserError> {
        self.store
            .ping()
            .await
            .map_err(|e| UserError::Storage(e.to_string()))
    }

    /// Insert a new user record.
    pub async fn create_user(&self, user: User) -> Result<User, UserError> {
        if let Some(pool) = self.store.as_sqlite() {
            create_user_sqlite(pool, user).await
        } else if let Some(pool) = self.store.as_postgres() {
            create_user_postgres(pool, user).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Get a user by their id.
    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, UserError> {
        if let Some(pool) = self.store.as_sqlite() {
            get_user_by_id_sqlite(pool, id).await
        } else if let Some(pool) = self.store.as_postgres() {
            get_user_by_id_postgres(pool, id).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Get a user by their username.
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, UserError> {
        if let Some(pool) = self.store.as_sqlite() {
            get_user_by_username_sqlite(pool, username).await
        } else if let Some(pool) = self.store.as_postgres() {
            get_user_by_username_postgres(pool, username).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Get a user by their email address.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        if let Some(pool) = self.store.as_sqlite() {
            get_user_by_email_sqlite(pool, email).await
        } else if let Some(pool) = self.store.as_postgres() {
            get_user_by_email_postgres(pool, email).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Get a user matching `identifier` against either username or email.
    pub async fn get_user_by_username_or_email(
        &self,
        identifier: &str,
    ) -> Result<Option<User>, UserError> {
        if let Some(pool) = self.store.as_sqlite() {
            get_user_by_username_or_email_sqlite(pool, identifier).await
        } else if let Some(pool) = self.store.as_postgres() {
            get_user_by_username_or_email_postgres(pool, identifier).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> UserDb {
        let store = DataStore::connect("sqlite::memory:").await.unwrap();
        let db = UserDb::new(store);
        db.init().await.unwrap();
        db
    }

    fn sample_user(username: &str, email: &str) -> User {
        User::new(
            username.to_string(),
            email.to_string(),
            "$argon2id$stub-digest".to_string(),
        )
    }

    #[tokio::test]
    async fn test_create_and_lookup_by_each_key() {
        let db = test_db().await;
        let user = db
            .create_user(sample_user("alice", "alice@example.com"))
            .await
            .unwrap();

        let by_id = db.get_user_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(by_id, user);

        let by_username = db.get_user_by_username("alice").await.unwrap().unwrap();
        assert_eq!(by_username.id, user.id);

        let by_email = db
            .get_user_by_email("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);

        let by_either = db
            .get_user_by_username_or_email("alice")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_either.id, user.id);

        let by_either = db
            .get_user_by_username_or_email("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_either.id, user.id);
    }

    #[tokio::test]
    async fn test_lookup_missing_user_is_none() {
        let db = test_db().await;
        assert!(db.get_user_by_id("no-such-id").await.unwrap().is_none());
        assert!(db.get_user_by_username("ghost").await.unwrap().is_none());
        assert!(
            db.get_user_by_username_or_email("ghost@example.com")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_duplicate_username_is_rejected_by_unique_index() {
        let db = test_db().await;
        db.create_user(sample_user("alice", "alice@example.com"))
            .await
            .unwrap();

        let result = db
            .create_user(sample_user("alice", "other@example.com"))
            .await;
        assert!(matches!(result, Err(UserError::Storage(_))));
    }

    #[tokio::test]
    async fn test_ping() {
        let db = test_db().await;
        assert!(db.ping().await.is_ok());
    }
}
