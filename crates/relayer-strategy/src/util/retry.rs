use core::future::Future;
use core::time::Duration;

use retry::delay::Fixed;

use crate::config::RetryConfig;

/// A bounded retry policy with a fixed delay between attempts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

/// The operation did not succeed within the attempt budget, or failed
/// with an error that is not worth retrying.
#[derive(Debug)]
pub struct RetryError<E> {
    pub attempts: u32,
    pub last_error: E,
}

impl RetryPolicy {
    /// A policy that runs the operation at least once.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Delays to wait between consecutive attempts.
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        Fixed::from(self.delay).take(self.max_attempts as usize - 1)
    }

    /// Run `op` until it succeeds, fails with an error `is_retryable`
    /// rejects, or the attempt budget is exhausted.
    ///
    /// `on_retry` observes every retryable failure with its 1-based attempt
    /// number, including the one that exhausts the budget. Errors rejected
    /// by `is_retryable` are returned without being observed.
    pub async fn retry<T, E, Op, Fut, R, C>(
        &self,
        mut op: Op,
        is_retryable: R,
        mut on_retry: C,
    ) -> Result<T, RetryError<E>>
    where
        Op: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        R: Fn(&E) -> bool,
        C: FnMut(u32, &E),
    {
        let mut delays = self.delays();
        let mut attempt = 0;

        loop {
            attempt += 1;

            let e = match op().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if !is_retryable(&e) {
                return Err(RetryError {
                    attempts: attempt,
                    last_error: e,
                });
            }

            on_retry(attempt, &e);

            match delays.next() {
                Some(delay) => tokio::time::sleep(delay).await,
                None => {
                    return Err(RetryError {
                        attempts: attempt,
                        last_error: e,
                    })
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(config.max_attempts, config.delay)
    }
}

#[cfg(test)]
mod tests {
    use core::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    const POLICY: RetryPolicy = RetryPolicy {
        max_attempts: 5,
        delay: Duration::from_millis(400),
    };

    #[test]
    fn default_policy() {
        assert_eq!(RetryPolicy::default(), POLICY);
        assert_eq!(
            POLICY.delays().collect::<Vec<_>>(),
            vec![Duration::from_millis(400); 4]
        );
    }

    #[test]
    fn at_least_one_attempt() {
        let policy = RetryPolicy::new(0, Duration::from_millis(1));

        assert_eq!(policy.max_attempts(), 1);
        assert_eq!(policy.delays().count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_transient_failures() {
        let calls = &AtomicU32::new(0);
        let mut observed = vec![];

        let result = POLICY
            .retry(
                move || async move {
                    match calls.fetch_add(1, Ordering::SeqCst) {
                        0 | 1 => Err("nil response"),
                        n => Ok(n),
                    }
                },
                |_| true,
                |attempt, e| observed.push((attempt, e.to_string())),
            )
            .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(
            observed,
            vec![(1, "nil response".to_string()), (2, "nil response".to_string())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_attempts() {
        let calls = &AtomicU32::new(0);
        let mut observed = 0;

        let result = POLICY
            .retry(
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>("connection refused")
                },
                |_| true,
                |_, _| observed += 1,
            )
            .await;

        let e = result.unwrap_err();
        assert_eq!(e.attempts, 5);
        assert_eq!(e.last_error, "connection refused");
        assert_eq!(calls.load(Ordering::SeqCst), 5);
        assert_eq!(observed, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_on_non_retryable_error() {
        let calls = &AtomicU32::new(0);
        let mut observed = vec![];

        let result = POLICY
            .retry(
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>("malformed")
                },
                |e| *e != "malformed",
                |attempt, _| observed.push(attempt),
            )
            .await;

        assert_eq!(result.unwrap_err().attempts, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(observed.is_empty());
    }
}
