//! Request Pipeline
//!
//! Stage order, outermost first: recovery, logging, authentication, CSRF,
//! handler. The admission stages are route layers so unmatched paths still
//! 404 instead of 401.

use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};

use crate::domain::repository::{SessionStore, UserRepository};
use crate::presentation::handlers::AuthAppState;
use crate::presentation::logging::log_requests;
use crate::presentation::middleware::{require_auth, require_csrf};
use crate::presentation::recovery::recover;

/// Put `routes` behind authentication and CSRF checks
pub fn protect<S, U>(
    routes: Router<AuthAppState<S, U>>,
    state: AuthAppState<S, U>,
) -> Router<AuthAppState<S, U>>
where
    S: SessionStore + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    // Last layer added runs first
    routes
        .route_layer(from_fn_with_state(state.clone(), require_csrf::<S, U>))
        .route_layer(from_fn_with_state(state, require_auth::<S, U>))
}

/// Wrap a whole application in the logging and recovery stages
pub fn with_outer_stages<T>(router: Router<T>) -> Router<T>
where
    T: Clone + Send + Sync + 'static,
{
    router.layer(from_fn(log_requests)).layer(from_fn(recover))
}
