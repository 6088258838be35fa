//! Token-bucket rate limiter bounding outbound requests to the venue.

use std::sync::Mutex;
use std::time::{Duration, Instant};

pub struct RateLimiter {
    capacity: f64,
    refill_per_sec: f64,
    state: Mutex<(f64, Instant)>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(requests_per_second: f64) -> Self {
        Self {
            capacity: requests_per_second.max(1.0),
            refill_per_sec: requests_per_second.max(0.001),
            state: Mutex::new((requests_per_second.max(1.0), Instant::now())),
        }
    }

    /// Blocks until one token is available, then consumes it.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut guard = self.state.lock().expect("rate limiter mutex poisoned");
                let (tokens, last) = &mut *guard;
                let now = Instant::now();
                let elapsed = now.duration_since(*last).as_secs_f64();
                *tokens = (*tokens + elapsed * self.refill_per_sec).min(self.capacity);
                *last = now;

                if *tokens >= 1.0 {
                    *tokens -= 1.0;
                    None
                } else {
                    Some(Duration::from_secs_f64((1.0 - *tokens) / self.refill_per_sec))
                }
            };
            match wait {
                None => return,
                Some(duration) => tokio::time::sleep(duration).await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_requests_up_to_capacity_do_not_block() {
        let limiter = RateLimiter::new(5.0);
        let start = Instant::now();
        for _ in 0..5 {
            limiter.acquire().await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn exceeding_capacity_forces_a_wait() {
        let limiter = RateLimiter::new(2.0);
        for _ in 0..2 {
            limiter.acquire().await;
        }
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(200));
    }
}
