//! Session Token Value Object
//!
//! Opaque bearer token carried in the session cookie. It doubles as the
//! session store key.

use std::fmt;

use platform::crypto::{sha256, to_base64_url, try_random_bytes};

use crate::error::{AuthError, AuthResult};

/// Bytes of OS randomness behind each token
pub const TOKEN_SEED_LEN: usize = 32;

/// Session token
///
/// `Debug` is redacted so tokens never end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generate a fresh token: SHA-256 over 32 OS-random bytes, URL-safe Base64
    pub fn generate() -> AuthResult<Self> {
        let seed = try_random_bytes(TOKEN_SEED_LEN)
            .map_err(|e| AuthError::Internal(format!("entropy source failed: {e}")))?;
        Ok(Self(to_base64_url(&sha256(&seed))))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for SessionToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_tokens_are_cookie_safe() {
        let token = SessionToken::generate().unwrap();
        // 32 bytes -> 43 base64 characters without padding
        assert_eq!(token.as_str().len(), 43);
        assert!(
            token
                .as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_generated_tokens_differ() {
        let a = SessionToken::generate().unwrap();
        let b = SessionToken::generate().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_debug_is_redacted() {
        let token = SessionToken::from("secret-token".to_string());
        assert!(!format!("{token:?}").contains("secret-token"));
    }
}
