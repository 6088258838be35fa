//! Retry with exponential backoff and full jitter, shared by every outbound
//! call the Market Source makes.

use std::time::Duration;

use rand::Rng;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub const fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            max_delay,
        }
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        let exp = self.base_delay.as_millis().saturating_mul(1u128 << attempt.min(16));
        let capped = exp.min(self.max_delay.as_millis());
        let jittered = rand::thread_rng().gen_range(0..=capped.max(1));
        Duration::from_millis(jittered as u64)
    }

    /// Runs `op` until it succeeds or `max_attempts` is exhausted, sleeping
    /// with full jitter between attempts. On final failure, wraps the last
    /// error as `Error::SourceUnavailable`.
    pub async fn run<F, Fut, T>(&self, label: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut last_err = None;
        for attempt in 0..self.max_attempts {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    last_err = Some(err);
                    if attempt + 1 < self.max_attempts {
                        tokio::time::sleep(self.delay_for(attempt)).await;
                    }
                }
            }
        }
        Err(Error::SourceUnavailable {
            attempts: self.max_attempts,
            reason: last_err.map(|e| e.to_string()).unwrap_or_else(|| label.to_string()),
        })
    }
}
