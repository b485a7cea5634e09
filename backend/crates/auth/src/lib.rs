//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, store and repository traits
//! - `application/` - Session manager, CSRF tokens, use cases
//! - `infra/` - Redis, PostgreSQL and in-memory implementations
//! - `presentation/` - Middleware pipeline, HTTP handlers, DTOs, router
//!
//! ## Features
//! - User signup/signin with login + password
//! - Server-side sessions behind opaque cookie tokens
//! - Stateless HS256 CSRF tokens for state-changing requests
//! - Request pipeline: recovery, logging, authentication, CSRF
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, compared in constant time
//! - Session tokens derived from 32 bytes of OS randomness
//! - CSRF tokens bound to the session's user and valid for a short window
//! - Internal failures never reach the client verbatim

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::entity::identity::AuthenticatedIdentity;
pub use error::{AuthError, AuthResult};
pub use infra::{InMemorySessionStore, InMemoryUserRepository, PgUserRepository, RedisSessionStore};
pub use presentation::handlers::AuthAppState;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
    pub use crate::presentation::pipeline::{protect, with_outer_stages};
    pub use crate::presentation::recovery::{AbortRequest, install_panic_hook};
}
