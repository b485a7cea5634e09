//! Auth Middleware
//!
//! Authentication and CSRF admission stages for protected routes. Both run
//! as `axum::middleware::from_fn_with_state` layers over [`AuthAppState`].

use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;
use platform::cookie::extract_cookie;

use crate::application::deadline;
use crate::domain::entity::identity::AuthenticatedIdentity;
use crate::domain::repository::{SessionStore, UserRepository};
use crate::error::{AuthError, reason};
use crate::presentation::handlers::AuthAppState;

/// Middleware that requires a valid session cookie
///
/// On success the resolved [`AuthenticatedIdentity`] is attached to the
/// request. Lookup failures are logged here and collapsed into generic
/// 401 rejections.
pub async fn require_auth<S, U>(
    State(state): State<AuthAppState<S, U>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    S: SessionStore + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let token = extract_cookie(req.headers(), &state.config.session_cookie_name)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::Unauthorized(reason::MISSING_TOKEN))?;

    let session = state
        .sessions
        .get_session_by_cookie(&token)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Session lookup failed");
            AuthError::Unauthorized(reason::TOKEN_VALIDATION_FAILED)
        })?;

    let lookup = deadline::within(
        state.config.store_timeout,
        state.users.find_by_id(&session.user_id),
    )
    .await;

    let user = match lookup {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::warn!(user_id = %session.user_id, "Session refers to unknown user");
            return Err(AuthError::Unauthorized(reason::USER_CHECK_FAILED));
        }
        Err(e) => {
            tracing::warn!(user_id = %session.user_id, error = %e, "User lookup failed");
            return Err(AuthError::Unauthorized(reason::USER_CHECK_FAILED));
        }
    };

    req.extensions_mut()
        .insert(AuthenticatedIdentity::new(user, session.token));

    Ok(next.run(req).await)
}

/// Middleware that requires a CSRF token on state-changing requests
///
/// Must sit inside [`require_auth`]: the token is checked against the
/// identity that stage attached.
pub async fn require_csrf<S, U>(
    State(state): State<AuthAppState<S, U>>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    S: SessionStore + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    if !is_state_changing(req.method()) {
        return Ok(next.run(req).await);
    }

    let expected = req
        .extensions()
        .get::<AuthenticatedIdentity>()
        .map(AuthenticatedIdentity::user_id)
        .ok_or(AuthError::Unauthorized(reason::MISSING_IDENTITY))?;

    let header = match req.headers().get(state.config.csrf_header_name.as_str()) {
        None => return Err(AuthError::BadRequest(reason::MISSING_CSRF_TOKEN)),
        Some(value) => value
            .to_str()
            .map_err(|_| AuthError::BadRequest(reason::INVALID_CSRF_TOKEN))?
            .trim(),
    };
    if header.is_empty() {
        return Err(AuthError::BadRequest(reason::MISSING_CSRF_TOKEN));
    }

    let token_user = state.csrf.verify_token(header).map_err(|e| {
        tracing::debug!(error = %e, "CSRF token rejected");
        AuthError::BadRequest(reason::INVALID_CSRF_TOKEN)
    })?;

    if token_user != expected {
        tracing::warn!(
            user_id = %expected,
            token_user_id = %token_user,
            "CSRF token issued to another user"
        );
        return Err(AuthError::BadRequest(reason::INVALID_CSRF_TOKEN));
    }

    Ok(next.run(req).await)
}

/// Methods that must carry a CSRF token
pub fn is_state_changing(method: &Method) -> bool {
    [Method::POST, Method::PUT, Method::PATCH, Method::DELETE].contains(method)
}
