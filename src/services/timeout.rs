use std::{future::Future, time::Duration};

use crate::errors::{AppError, AppResult};

/// Bounds a remote call. On expiry the future is dropped, which abandons the
/// request client-side only; the store may still apply it.
pub async fn with_timeout<T, F>(limit: Duration, operation: &str, call: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(AppError::Timeout(format!(
            "{} did not complete within {}ms",
            operation,
            limit.as_millis()
        ))),
    }
}
