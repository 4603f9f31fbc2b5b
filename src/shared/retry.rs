//! Usage: Bounded retry-with-delay helper for eventually-consistent backend reads.

use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

/// Runs `op` once, then up to `max_retries` more times (waiting `delay` between
/// attempts) while `is_settled` rejects the fetched value.
///
/// The last fetched value is returned even when the predicate never accepted it;
/// callers that care can re-apply the predicate to the returned value. Errors
/// from `op` abort the loop immediately.
pub async fn retry_until<T, E, F, Fut, P>(
    policy: RetryPolicy,
    mut op: F,
    mut is_settled: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: FnMut(&T) -> bool,
{
    let mut value = op().await?;
    let mut retries = 0u32;
    while !is_settled(&value) && retries < policy.max_retries {
        tokio::time::sleep(policy.delay).await;
        retries += 1;
        tracing::debug!(retry = retries, max = policy.max_retries, "value not settled, re-fetching");
        value = op().await?;
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    const POLICY: RetryPolicy = RetryPolicy {
        max_retries: 3,
        delay: Duration::from_millis(500),
    };

    #[tokio::test(start_paused = true)]
    async fn settled_first_try_does_not_retry() {
        let calls = AtomicU32::new(0);
        let value = retry_until(
            POLICY,
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, String>(7u32) }
            },
            |v| *v == 7,
        )
        .await
        .expect("retry_until");
        assert_eq!(value, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unsettled_value_is_returned_after_exhaustion() {
        let calls = AtomicU32::new(0);
        let started = tokio::time::Instant::now();
        let value = retry_until(
            POLICY,
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move { Ok::<_, String>(n) }
            },
            |_| false,
        )
        .await
        .expect("retry_until");
        // 1 initial + 3 retries, last value wins.
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(value, 3);
        assert_eq!(started.elapsed(), Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn settles_midway_and_stops_retrying() {
        let calls = AtomicU32::new(0);
        let value = retry_until(
            POLICY,
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move { Ok::<_, String>(n) }
            },
            |v| *v >= 2,
        )
        .await
        .expect("retry_until");
        assert_eq!(value, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn error_aborts_immediately() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, String> = retry_until(
            POLICY,
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("SYSTEM_ERROR: fetch failed".to_string()) }
            },
            |_| false,
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
