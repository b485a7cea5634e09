//! Value Object Module

pub mod csrf_claims;
pub mod session_token;
pub mod user_id;
