//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

// ============================================================================
// Sign Up / Sign In
// ============================================================================

/// Credentials for sign up and sign in
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    pub login: String,
    pub password: String,
}

/// The signed-in user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: String,
    pub login: String,
}

// ============================================================================
// CSRF
// ============================================================================

/// Fresh CSRF token
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrfTokenResponse {
    pub csrf_token: String,
    /// Token lifetime in seconds
    pub expires_in: u64,
}
