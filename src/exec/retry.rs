// src/exec/retry.rs

//! Bounded retry for transient infrastructure failures.

use std::future::Future;

use tracing::warn;

use crate::errors::{DriveError, Result};

/// Retry bound for transient failures, counting the first attempt.
pub const MAX_ATTEMPTS: usize = 5;

/// Run `op`, retrying while it fails with [`DriveError::TransientInfra`].
///
/// Retries are immediate: the triggering condition is a one-shot filesystem
/// race during concurrent directory creation, not a load-dependent failure.
/// Any other error propagates on its first occurrence. Once `max_attempts`
/// invocations have all failed transiently, the failure is escalated to the
/// fatal [`DriveError::RetriesExhausted`].
pub async fn with_retry<T, F, Fut>(what: &str, max_attempts: usize, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() => {
                if attempt >= max_attempts {
                    return Err(DriveError::RetriesExhausted {
                        what: what.to_string(),
                        attempts: attempt,
                    });
                }
                attempt += 1;
                warn!(
                    what,
                    attempt, "{what} hit a 'mkdir' race; trying again (attempt #{attempt})"
                );
            }
            Err(err) => return Err(err),
        }
    }
}
