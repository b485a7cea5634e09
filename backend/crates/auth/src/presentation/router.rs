//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};

use crate::domain::repository::{SessionStore, UserRepository};
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::pipeline;

/// Create the Auth router, meant to be nested under `/api/auth`
///
/// Sign up and sign in are public; everything else goes through the
/// admission stages.
pub fn auth_router<S, U>(state: AuthAppState<S, U>) -> Router
where
    S: SessionStore + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let protected = Router::new()
        .route("/signout", post(handlers::sign_out::<S, U>))
        .route("/csrf", get(handlers::csrf_token::<S, U>))
        .route("/me", get(handlers::me));

    Router::new()
        .route("/signup", post(handlers::sign_up::<S, U>))
        .route("/signin", post(handlers::sign_in::<S, U>))
        .merge(pipeline::protect(protected, state.clone()))
        .with_state(state)
}
