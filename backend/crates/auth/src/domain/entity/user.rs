//! User Entity
//!
//! Account record: identity, login name and password hash.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::value_object::user_id::UserId;

/// User entity
#[derive(Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// Login name (unique)
    pub login: String,
    /// Encoded Argon2id hash
    pub password_hash: String,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user
    pub fn new(login: String, password_hash: String) -> Self {
        Self {
            user_id: UserId::new(),
            login,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("user_id", &self.user_id)
            .field("login", &self.login)
            .field("password_hash", &"***")
            .field("created_at", &self.created_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_gets_fresh_id() {
        let a = User::new("alice".into(), "hash".into());
        let b = User::new("alice".into(), "hash".into());
        assert_ne!(a.user_id, b.user_id);
    }

    #[test]
    fn test_debug_hides_hash() {
        let user = User::new("alice".into(), "$argon2id$secret".into());
        assert!(!format!("{user:?}").contains("secret"));
    }
}
