//! Session Manager
//!
//! Issues, resolves and revokes opaque session tokens backed by a
//! [`SessionStore`]. Every store call is bounded by the configured timeout.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::application::config::AuthConfig;
use crate::domain::entity::session::Session;
use crate::domain::repository::{SessionStore, StoreError};
use crate::domain::value_object::{session_token::SessionToken, user_id::UserId};
use crate::error::{AuthError, AuthResult};

pub struct SessionManager<S> {
    store: Arc<S>,
    ttl: Option<Duration>,
    timeout: Duration,
}

impl<S> Clone for SessionManager<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            ttl: self.ttl,
            timeout: self.timeout,
        }
    }
}

impl<S> SessionManager<S>
where
    S: SessionStore + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, config: &AuthConfig) -> Self {
        Self {
            store,
            ttl: config.session_ttl,
            timeout: config.store_timeout,
        }
    }

    /// Deadline applied to each store call
    pub fn store_timeout(&self) -> Duration {
        self.timeout
    }

    /// Issue a new session for `user_id`
    pub async fn create_session(&self, user_id: UserId) -> AuthResult<Session> {
        let token = SessionToken::generate()?;

        self.bounded(
            self.store
                .set(token.as_str(), &user_id.to_string(), self.ttl),
        )
        .await
        .map_err(AuthError::StoreWrite)?;

        tracing::debug!(user_id = %user_id, "Session created");

        Ok(Session { user_id, token })
    }

    /// Resolve the session behind a cookie value
    pub async fn get_session_by_cookie(&self, token: &str) -> AuthResult<Session> {
        let value = self
            .bounded(self.store.get(token))
            .await
            .map_err(AuthError::StoreRead)?
            .ok_or(AuthError::SessionNotFound)?;

        let user_id = value
            .parse::<UserId>()
            .map_err(|_| AuthError::InvalidIdentifier)?;

        Ok(Session {
            user_id,
            token: SessionToken::from(token.to_string()),
        })
    }

    /// Revoke a session
    ///
    /// Deleting a token that is already gone succeeds.
    pub async fn delete_session(&self, token: &str) -> AuthResult<()> {
        let removed = self
            .bounded(self.store.delete(token))
            .await
            .map_err(AuthError::StoreWrite)?;

        if !removed {
            tracing::debug!("Session already absent on delete");
        }

        Ok(())
    }

    async fn bounded<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        tokio::time::timeout(self.timeout, op)
            .await
            .map_err(|_| StoreError::Timeout)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::InMemorySessionStore;

    /// Store whose every call fails
    struct FailingStore;

    impl SessionStore for FailingStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Backend("down".into()))
        }

        async fn set(
            &self,
            _key: &str,
            _value: &str,
            _ttl: Option<Duration>,
        ) -> Result<(), StoreError> {
            Err(StoreError::Backend("down".into()))
        }

        async fn delete(&self, _key: &str) -> Result<bool, StoreError> {
            Err(StoreError::Backend("down".into()))
        }
    }

    /// Store that never answers
    struct StalledStore;

    impl SessionStore for StalledStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            std::future::pending().await
        }

        async fn set(
            &self,
            _key: &str,
            _value: &str,
            _ttl: Option<Duration>,
        ) -> Result<(), StoreError> {
            std::future::pending().await
        }

        async fn delete(&self, _key: &str) -> Result<bool, StoreError> {
            std::future::pending().await
        }
    }

    fn manager<S: SessionStore + Send + Sync + 'static>(store: S) -> SessionManager<S> {
        let config = AuthConfig {
            store_timeout: Duration::from_millis(50),
            ..Default::default()
        };
        SessionManager::new(Arc::new(store), &config)
    }

    #[tokio::test]
    async fn test_create_then_resolve() {
        let sessions = manager(InMemorySessionStore::new());
        let user_id = UserId::new();

        let session = sessions.create_session(user_id).await.unwrap();
        let resolved = sessions
            .get_session_by_cookie(session.token.as_str())
            .await
            .unwrap();

        assert_eq!(resolved.user_id, user_id);
        assert_eq!(resolved.token, session.token);
    }

    #[tokio::test]
    async fn test_sessions_get_distinct_tokens() {
        let sessions = manager(InMemorySessionStore::new());
        let user_id = UserId::new();

        let a = sessions.create_session(user_id).await.unwrap();
        let b = sessions.create_session(user_id).await.unwrap();
        assert_ne!(a.token, b.token);
    }

    #[tokio::test]
    async fn test_unknown_token_is_not_found() {
        let sessions = manager(InMemorySessionStore::new());
        let err = sessions.get_session_by_cookie("nope").await.unwrap_err();
        assert!(matches!(err, AuthError::SessionNotFound));
    }

    #[tokio::test]
    async fn test_corrupt_value_is_invalid_identifier() {
        let store = InMemorySessionStore::new();
        store.set("tok", "not-a-uuid", None).await.unwrap();
        let sessions = manager(store);

        let err = sessions.get_session_by_cookie("tok").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidIdentifier));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let sessions = manager(InMemorySessionStore::new());
        let session = sessions.create_session(UserId::new()).await.unwrap();

        sessions.delete_session(session.token.as_str()).await.unwrap();
        sessions.delete_session(session.token.as_str()).await.unwrap();

        let err = sessions
            .get_session_by_cookie(session.token.as_str())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::SessionNotFound));
    }

    #[tokio::test]
    async fn test_store_failures_are_classified() {
        let sessions = manager(FailingStore);

        let err = sessions.create_session(UserId::new()).await.unwrap_err();
        assert!(matches!(err, AuthError::StoreWrite(_)));

        let err = sessions.get_session_by_cookie("tok").await.unwrap_err();
        assert!(matches!(err, AuthError::StoreRead(_)));

        let err = sessions.delete_session("tok").await.unwrap_err();
        assert!(matches!(err, AuthError::StoreWrite(_)));
    }

    #[tokio::test]
    async fn test_stalled_store_times_out() {
        let sessions = manager(StalledStore);

        let err = sessions.get_session_by_cookie("tok").await.unwrap_err();
        assert!(matches!(err, AuthError::StoreRead(StoreError::Timeout)));
    }
}
