//! Authenticated Identity
//!
//! Attached to the request by the authentication stage and read by the CSRF
//! stage and handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::entity::user::User;
use crate::domain::value_object::{session_token::SessionToken, user_id::UserId};
use crate::error::{AuthError, reason};

/// Identity resolved from a valid session
#[derive(Debug, Clone)]
pub struct AuthenticatedIdentity {
    pub user: User,
    pub session_token: SessionToken,
}

impl AuthenticatedIdentity {
    pub fn new(user: User, session_token: SessionToken) -> Self {
        Self {
            user,
            session_token,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user.user_id
    }
}

/// Extractor for handlers behind the authentication stage
///
/// Rejects with 401 when the stage did not run for this route.
impl<S> FromRequestParts<S> for AuthenticatedIdentity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedIdentity>()
            .cloned()
            .ok_or(AuthError::Unauthorized(reason::MISSING_IDENTITY))
    }
}
