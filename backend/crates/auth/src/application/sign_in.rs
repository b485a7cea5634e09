//! Sign In Use Case
//!
//! Authenticates a user and creates a session.

use std::sync::Arc;

use platform::password::{EncodedHash, PasswordHasher};

use crate::application::credentials::verify_password;
use crate::application::deadline;
use crate::application::session_manager::SessionManager;
use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::{SessionStore, UserRepository};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub login: String,
    pub password: String,
}

/// Sign in output
pub struct SignInOutput {
    pub user: User,
    pub session: Session,
}

/// Sign in use case
pub struct SignInUseCase<U, S> {
    user_repo: Arc<U>,
    sessions: SessionManager<S>,
    hasher: PasswordHasher,
}

impl<U, S> SignInUseCase<U, S>
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

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let user = deadline::within(
            self.sessions.store_timeout(),
            self.user_repo.find_by_login(input.login.trim()),
        )
        .await?;

        let Some(user) = user else {
            // Spend the same KDF time on unknown logins
            let _ = verify_password(&self.hasher, input.password, self.placeholder_hash()).await;
            return Err(AuthError::InvalidCredentials);
        };

        let matches =
            verify_password(&self.hasher, input.password, user.password_hash.clone()).await?;
        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        if self.hasher.needs_rehash(&user.password_hash) {
            tracing::info!(user_id = %user.user_id, "Password hash uses outdated parameters");
        }

        let session = self.sessions.create_session(user.user_id).await?;

        tracing::info!(user_id = %user.user_id, "User signed in");

        Ok(SignInOutput { user, session })
    }

    fn placeholder_hash(&self) -> String {
        let params = *self.hasher.params();
        EncodedHash {
            params,
            salt: vec![0; params.salt_len],
            digest: vec![0; params.digest_len],
        }
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::AuthConfig;
    use crate::application::sign_up::{SignUpInput, SignUpUseCase};
    use crate::domain::value_object::user_id::UserId;
    use crate::infra::memory::{InMemorySessionStore, InMemoryUserRepository};
    use platform::password::HashParameters;

    struct Fixture {
        sign_up: SignUpUseCase<InMemoryUserRepository, InMemorySessionStore>,
        sign_in: SignInUseCase<InMemoryUserRepository, InMemorySessionStore>,
    }

    fn fixture() -> Fixture {
        let users = Arc::new(InMemoryUserRepository::new());
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
        Fixture {
            sign_up: SignUpUseCase::new(users.clone(), sessions.clone(), hasher.clone()),
            sign_in: SignInUseCase::new(users, sessions, hasher),
        }
    }

    async fn register(f: &Fixture) {
        f.sign_up
            .execute(SignUpInput {
                login: "alice".to_string(),
                password: "correct horse".to_string(),
            })
            .await
            .unwrap();
    }

    fn input(login: &str, password: &str) -> SignInInput {
        SignInInput {
            login: login.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_in_issues_new_session() {
        let f = fixture();
        register(&f).await;

        let a = f.sign_in.execute(input("alice", "correct horse")).await.unwrap();
        let b = f.sign_in.execute(input("alice", "correct horse")).await.unwrap();
        assert_eq!(a.user.login, "alice");
        assert_ne!(a.session.token, b.session.token);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_login_look_the_same() {
        let f = fixture();
        register(&f).await;

        let wrong = f.sign_in.execute(input("alice", "battery staple")).await.err().unwrap();
        let unknown = f.sign_in.execute(input("mallory", "correct horse")).await.err().unwrap();

        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert!(matches!(unknown, AuthError::InvalidCredentials));
    }

    /// Repository that never answers
    struct StalledUsers;

    impl UserRepository for StalledUsers {
        async fn create(&self, _user: &User) -> AuthResult<()> {
            std::future::pending().await
        }

        async fn find_by_id(&self, _user_id: &UserId) -> AuthResult<Option<User>> {
            std::future::pending().await
        }

        async fn find_by_login(&self, _login: &str) -> AuthResult<Option<User>> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_repository_times_out() {
        let sessions = SessionManager::new(
            Arc::new(InMemorySessionStore::new()),
            &AuthConfig::default(),
        );
        let sign_in = SignInUseCase::new(
            Arc::new(StalledUsers),
            sessions,
            PasswordHasher::new(HashParameters::default()),
        );

        let err = sign_in
            .execute(input("alice", "correct horse"))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AuthError::RepositoryTimeout));
    }
}
