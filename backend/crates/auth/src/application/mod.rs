//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod credentials;
pub mod csrf_token;
pub mod deadline;
pub mod session_manager;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;

// Re-exports
pub use config::AuthConfig;
pub use csrf_token::CsrfTokenService;
pub use session_manager::SessionManager;
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
