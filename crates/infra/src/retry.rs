//! Bounded retry of transient storage failures.

use std::time::Duration;

use crate::error::Transient;

/// Linear backoff: the n-th retry waits `base_delay * n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included. `1` disables retries.
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    /// Delay before retry number `attempt` (1-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    /// Run `op` until it succeeds, fails permanently, or the attempts run out.
    pub async fn run<T, E, F>(&self, operation: &'static str, mut op: F) -> Result<T, E>
    where
        E: Transient + core::fmt::Display,
        F: FnMut() -> Result<T, E>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op() {
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    tracing::warn!(operation, attempt, error = %err, "transient storage failure, retrying");
                    tokio::time::sleep(self.delay_for_attempt(attempt)).await;
                    attempt += 1;
                }
                Err(err) => {
                    if err.is_transient() {
                        tracing::error!(operation, attempts = attempt, error = %err, "storage unavailable, giving up");
                    }
                    return Err(err);
                }
                Ok(value) => return Ok(value),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::error::ServiceError;

    fn fast(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
        }
    }

    #[test]
    fn backoff_is_linear() {
        let p = RetryPolicy::default();
        assert_eq!(p.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(p.delay_for_attempt(2), Duration::from_millis(200));
    }

    #[tokio::test]
    async fn recovers_from_a_transient_failure() {
        let calls = AtomicU32::new(0);
        let out = fast(3)
            .run("test", || {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(ServiceError::Unavailable("flaky".into()))
                } else {
                    Ok(7)
                }
            })
            .await;
        assert_eq!(out, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let out: Result<(), _> = fast(3)
            .run("test", || {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ServiceError::Unavailable("down".into()))
            })
            .await;
        assert!(matches!(out, Err(ServiceError::Unavailable(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let out: Result<(), _> = fast(3)
            .run("test", || {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ServiceError::NotFound)
            })
            .await;
        assert_eq!(out, Err(ServiceError::NotFound));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
