use serde::{Deserialize, Serialize};

/// Claims carried by a CSRF token
///
/// `sub` is the user identifier in text form, `iat`/`exp` are Unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsrfClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}
