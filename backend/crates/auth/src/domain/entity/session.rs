use crate::domain::value_object::{session_token::SessionToken, user_id::UserId};

/// Server-side session: the user a token was issued to
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: UserId,
    pub token: SessionToken,
}
