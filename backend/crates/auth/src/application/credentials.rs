//! Password hashing off the async executor
//!
//! Argon2id is deliberately slow, so both directions run on the blocking pool.

use platform::password::PasswordHasher;

use crate::error::{AuthError, AuthResult};

pub async fn hash_password(hasher: &PasswordHasher, password: String) -> AuthResult<String> {
    let hasher = hasher.clone();
    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| AuthError::Internal(format!("hashing task failed: {e}")))?
        .map_err(AuthError::from)
}

pub async fn verify_password(
    hasher: &PasswordHasher,
    password: String,
    encoded: String,
) -> AuthResult<bool> {
    let hasher = hasher.clone();
    tokio::task::spawn_blocking(move || hasher.verify(&password, &encoded))
        .await
        .map_err(|e| AuthError::Internal(format!("verification task failed: {e}")))?
        .map_err(AuthError::from)
}
