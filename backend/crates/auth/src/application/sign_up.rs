//! Sign Up Use Case
//!
//! Creates a new user account and opens its first session.

use std::sync::Arc;

use platform::password::PasswordHasher;

use crate::application::credentials::hash_password;
use crate::application::deadline;
use crate::application::session_manager::SessionManager;
use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::{SessionStore, UserRepository};
use crate::error::{AuthError, AuthResult};

pub const MAX_LOGIN_LEN: usize = 64;
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;

/// Sign up input
pub struct SignUpInput {
    pub login: String,
    pub password: String,
}

/// Sign up output
pub struct SignUpOutput {
    pub user: User,
    pub session: Session,
}

/// Sign up use case
pub struct SignUpUseCase<U, S> {
    user_repo: Arc<U>,
    sessions: SessionManager<S>,
    hasher: PasswordHasher,
}

impl<U, S> SignUpUseCase<U, S>
where
    U: UserRepository + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    pub fn new(user_repo: Arc<U>, sessions: SessionManager<S>, hasher: PasswordHasher) -> Self {
        Self {
            user_repo,
            sessions,
            hasher,
        }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        let login = input.login.trim().to_string();
        if login.is_empty() {
            return Err(AuthError::Validation("login must not be empty"));
        }
        if login.chars().count() > MAX_LOGIN_LEN {
            return Err(AuthError::Validation("login is too long"));
        }

        let password_len = input.password.chars().count();
        if password_len < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation("password is too short"));
        }
        if password_len > MAX_PASSWORD_LEN {
            return Err(AuthError::Validation("password is too long"));
        }

        let timeout = self.sessions.store_timeout();

        // Check if login is taken
        if deadline::within(timeout, self.user_repo.find_by_login(&login))
            .await?
            .is_some()
        {
            return Err(AuthError::LoginTaken);
        }

        let password_hash = hash_password(&self.hasher, input.password).await?;
        let user = User::new(login, password_hash);
        deadline::within(timeout, self.user_repo.create(&user)).await?;

        let session = self.sessions.create_session(user.user_id).await?;

        tracing::info!(
            user_id = %user.user_id,
            login = %user.login,
            "User signed up"
        );

        Ok(SignUpOutput { user, session })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::AuthConfig;
    use crate::infra::memory::{InMemorySessionStore, InMemoryUserRepository};
    use platform::password::HashParameters;

    fn use_case(
        users: Arc<InMemoryUserRepository>,
    ) -> SignUpUseCase<InMemoryUserRepository, InMemorySessionStore> {
        let sessions = SessionManager::new(
            Arc::new(InMemorySessionStore::new()),
            &AuthConfig::default(),
        );
        let hasher = PasswordHasher::new(HashParameters {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
            ..Default::default()
        });
        SignUpUseCase::new(users, sessions, hasher)
    }

    fn input(login: &str, password: &str) -> SignUpInput {
        SignUpInput {
            login: login.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_up_stores_hash_not_password() {
        let users = Arc::new(InMemoryUserRepository::new());
        let output = use_case(users.clone())
            .execute(input(" alice ", "correct horse"))
            .await
            .unwrap();

        let stored = users.find_by_login("alice").await.unwrap().unwrap();
        assert_eq!(stored.user_id, output.user.user_id);
        assert!(stored.password_hash.starts_with("$argon2id$v=19$"));
        assert!(!stored.password_hash.contains("correct horse"));
        assert_eq!(output.session.user_id, output.user.user_id);
    }

    #[tokio::test]
    async fn test_duplicate_login_is_rejected() {
        let users = Arc::new(InMemoryUserRepository::new());
        let sign_up = use_case(users);

        sign_up.execute(input("alice", "password-1")).await.unwrap();
        let err = sign_up
            .execute(input("alice", "password-2"))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AuthError::LoginTaken));
    }

    #[tokio::test]
    async fn test_input_validation() {
        let sign_up = use_case(Arc::new(InMemoryUserRepository::new()));

        let err = sign_up.execute(input("   ", "password-1")).await.err().unwrap();
        assert!(matches!(err, AuthError::Validation(_)));

        let err = sign_up.execute(input("bob", "short")).await.err().unwrap();
        assert!(matches!(err, AuthError::Validation(_)));
    }
}
