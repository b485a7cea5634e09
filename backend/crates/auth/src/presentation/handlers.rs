//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderName, HeaderValue, StatusCode, header};
use axum::response::IntoResponse;
use platform::cookie::set_cookie_header;
use platform::password::PasswordHasher;

use crate::application::config::AuthConfig;
use crate::application::{
    CsrfTokenService, SessionManager, SignInInput, SignInUseCase, SignOutUseCase, SignUpInput,
    SignUpUseCase,
};
use crate::domain::entity::{identity::AuthenticatedIdentity, user::User};
use crate::domain::repository::{SessionStore, UserRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{CredentialsRequest, CsrfTokenResponse, UserResponse};

/// Shared state for auth handlers and middleware
pub struct AuthAppState<S, U> {
    pub sessions: SessionManager<S>,
    pub users: Arc<U>,
    pub csrf: Arc<CsrfTokenService>,
    pub config: Arc<AuthConfig>,
}

impl<S, U> Clone for AuthAppState<S, U> {
    fn clone(&self) -> Self {
        Self {
            sessions: self.sessions.clone(),
            users: self.users.clone(),
            csrf: self.csrf.clone(),
            config: self.config.clone(),
        }
    }
}

impl<S, U> AuthAppState<S, U>
where
    S: SessionStore + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, users: Arc<U>, config: AuthConfig) -> Self {
        Self {
            sessions: SessionManager::new(store, &config),
            users,
            csrf: Arc::new(CsrfTokenService::from_config(&config)),
            config: Arc::new(config),
        }
    }

    fn hasher(&self) -> PasswordHasher {
        PasswordHasher::new(self.config.password_params)
    }
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/auth/signup
pub async fn sign_up<S, U>(
    State(state): State<AuthAppState<S, U>>,
    Json(req): Json<CredentialsRequest>,
) -> AuthResult<impl IntoResponse>
where
    S: SessionStore + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(state.users.clone(), state.sessions.clone(), state.hasher());

    let output = use_case
        .execute(SignUpInput {
            login: req.login,
            password: req.password,
        })
        .await?;

    let cookie = session_cookie(&state.config, output.session.token.as_str())?;

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(user_response(&output.user)),
    ))
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /api/auth/signin
pub async fn sign_in<S, U>(
    State(state): State<AuthAppState<S, U>>,
    Json(req): Json<CredentialsRequest>,
) -> AuthResult<impl IntoResponse>
where
    S: SessionStore + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.users.clone(), state.sessions.clone(), state.hasher());

    let output = use_case
        .execute(SignInInput {
            login: req.login,
            password: req.password,
        })
        .await?;

    let cookie = session_cookie(&state.config, output.session.token.as_str())?;

    Ok(([(header::SET_COOKIE, cookie)], Json(user_response(&output.user))))
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /api/auth/signout
pub async fn sign_out<S, U>(
    State(state): State<AuthAppState<S, U>>,
    identity: AuthenticatedIdentity,
) -> AuthResult<impl IntoResponse>
where
    S: SessionStore + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    SignOutUseCase::new(state.sessions.clone())
        .execute(&identity)
        .await?;

    let cookie = set_cookie_header(&state.config.session_cookie().build_delete_cookie())
        .ok_or_else(|| AuthError::Internal("invalid cookie header".to_string()))?;

    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]))
}

// ============================================================================
// CSRF
// ============================================================================

/// GET /api/auth/csrf
///
/// The token is returned both in the body and in the CSRF header.
pub async fn csrf_token<S, U>(
    State(state): State<AuthAppState<S, U>>,
    identity: AuthenticatedIdentity,
) -> AuthResult<impl IntoResponse>
where
    S: SessionStore + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let token = state.csrf.generate_token(identity.user_id())?;

    let header_name = HeaderName::from_bytes(state.config.csrf_header_name.as_bytes())
        .map_err(|e| AuthError::Internal(format!("invalid CSRF header name: {e}")))?;
    let header_value = HeaderValue::from_str(&token)
        .map_err(|e| AuthError::Internal(format!("invalid CSRF header value: {e}")))?;

    Ok((
        [
            (header_name, header_value),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-store")),
        ],
        Json(CsrfTokenResponse {
            csrf_token: token,
            expires_in: state.csrf.ttl().as_secs(),
        }),
    ))
}

// ============================================================================
// Current user
// ============================================================================

/// GET /api/auth/me
pub async fn me(identity: AuthenticatedIdentity) -> Json<UserResponse> {
    Json(user_response(&identity.user))
}

// ============================================================================
// Helpers
// ============================================================================

fn session_cookie(config: &AuthConfig, token: &str) -> AuthResult<HeaderValue> {
    set_cookie_header(&config.session_cookie().build_set_cookie(token))
        .ok_or_else(|| AuthError::Internal("invalid cookie header".to_string()))
}

fn user_response(user: &User) -> UserResponse {
    UserResponse {
        user_id: user.user_id.to_string(),
        login: user.login.clone(),
    }
}
