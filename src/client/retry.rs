//! Bounded retry executor.
//!
//! Every API call funnels its round trip through [`retry`]. The operation is
//! attempted up to `retries + 1` times; the first success wins and, when all
//! attempts fail, the error from the final attempt is returned.

use std::future::Future;

use super::config::RetryConfig;
use crate::Result;

/// Run `op` until it succeeds or `retries + 1` attempts have been made.
///
/// Which errors are retried is decided by [`RetryConfig::should_retry`];
/// under the default policy every error is. Between attempts the executor
/// waits [`RetryConfig::backoff_for_attempt`], which is zero by default.
///
/// Cancellation is left to the caller: dropping the returned future stops
/// any further attempts.
///
/// # Example
///
/// ```
/// use gocardless_rs::client::retry;
/// use gocardless_rs::RetryConfig;
///
/// # async fn example() -> gocardless_rs::Result<()> {
/// let value = retry(&RetryConfig::default(), 3, || async { Ok::<_, gocardless_rs::Error>(42) }).await?;
/// assert_eq!(value, 42);
/// # Ok(())
/// # }
/// ```
pub async fn retry<T, F, Fut>(config: &RetryConfig, retries: u32, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt: u32 = 0;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= retries || !config.should_retry(&err) {
                    if attempt > 0 {
                        tracing::debug!(
                            attempts = attempt.saturating_add(1),
                            error = %err,
                            "giving up after final attempt"
                        );
                    }
                    return Err(err);
                }

                let delay = config.backoff_for_attempt(attempt);
                tracing::warn!(
                    attempt = attempt.saturating_add(1),
                    max_attempts = retries.saturating_add(1),
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "request attempt failed; retrying"
                );

                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                attempt += 1;
            }
        }
    }
}
