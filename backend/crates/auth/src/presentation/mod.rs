//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and the request pipeline stages.

pub mod dto;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod pipeline;
pub mod recovery;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{require_auth, require_csrf};
pub use router::auth_router;
