//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use std::time::Duration;

use thiserror::Error;

use crate::domain::entity::user::User;
use crate::domain::value_object::user_id::UserId;
use crate::error::AuthResult;

/// Session store failure
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),

    #[error("store operation timed out")]
    Timeout,
}

/// Key-value session store
///
/// Values are opaque strings. A `None` ttl means the entry never expires.
#[trait_variant::make(SessionStore: Send)]
pub trait LocalSessionStore {
    /// Read a value; `None` when absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError>;

    /// Remove a value; `false` when nothing was stored under the key
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;
}

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by login name
    async fn find_by_login(&self, login: &str) -> AuthResult<Option<User>>;
}
