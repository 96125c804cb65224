//! Request-scoped deadlines for store and network operations.

use std::future::Future;

use tokio::time::Instant;

use crate::Error;

/// Run `fut` until it completes or `deadline` passes.
///
/// Expiry maps to [`Error::DeadlineExceeded`] naming `what`; the future is
/// dropped, cancelling any in-flight I/O it owns.
pub async fn within<T, F>(deadline: Instant, what: &str, fut: F) -> Result<T, Error>
where
    F: Future<Output = Result<T, Error>>,
{
    match tokio::time::timeout_at(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(Error::DeadlineExceeded(what.to_string())),
    }
}
