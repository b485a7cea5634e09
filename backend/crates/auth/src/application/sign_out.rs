//! Sign Out Use Case
//!
//! Invalidates a user session.

use crate::application::session_manager::SessionManager;
use crate::domain::entity::identity::AuthenticatedIdentity;
use crate::domain::repository::SessionStore;
use crate::error::AuthResult;

/// Sign out use case
pub struct SignOutUseCase<S> {
    sessions: SessionManager<S>,
}

impl<S> SignOutUseCase<S>
where
    S: SessionStore + Send + Sync + 'static,
{
    pub fn new(sessions: SessionManager<S>) -> Self {
        Self { sessions }
    }

    /// Sign out from current session
    pub async fn execute(&self, identity: &AuthenticatedIdentity) -> AuthResult<()> {
        self.sessions
            .delete_session(identity.session_token.as_str())
            .await?;

        tracing::info!(user_id = %identity.user_id(), "User signed out");
        Ok(())
    }
}
