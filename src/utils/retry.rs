// src/utils/retry.rs

//! Bounded retry for unreliable network operations.
//!
//! Transient transport failures (as classified by `AppError::is_transient`)
//! are re-attempted after a fixed delay; all other errors propagate
//! immediately. The wait blocks the whole run, which is acceptable for a
//! periodic batch job.

use std::future::Future;
use std::time::Duration;

use crate::error::Result;

/// Fixed-delay retry policy.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// Create a policy. `max_attempts` counts the first call and is
    /// clamped to at least one.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Invoke `op`, retrying transient failures up to the attempt bound.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.max_attempts => {
                    log::warn!(
                        "{label}: transient failure ({e}), retrying ({attempt}/{})",
                        self.max_attempts
                    );
                    attempt += 1;
                    tokio::time::sleep(self.delay).await;
                }
                Err(e) => {
                    if e.is_transient() {
                        log::error!(
                            "{label}: still failing after {} attempts, giving up",
                            self.max_attempts
                        );
                    }
                    return Err(e);
                }
            }
        }
    }
}
