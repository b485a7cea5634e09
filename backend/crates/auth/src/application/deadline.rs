//! Store timeout for user repository calls

use std::future::Future;
use std::time::Duration;

use crate::error::{AuthError, AuthResult};

/// Run a repository call, failing with [`AuthError::RepositoryTimeout`]
/// once `timeout` elapses
pub async fn within<T, F>(timeout: Duration, op: F) -> AuthResult<T>
where
    F: Future<Output = AuthResult<T>>,
{
    tokio::time::timeout(timeout, op)
        .await
        .map_err(|_| AuthError::RepositoryTimeout)?
}
