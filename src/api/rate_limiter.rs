//! Token-bucket rate limiter.
//!
//! The bucket starts full. Every acquisition first refills it in proportion
//! to the time elapsed since the last refill, capped at capacity. A caller
//! that finds less than one token sleeps for exactly the time the missing
//! fraction needs to accrue, then measures again.

use parking_lot::Mutex;
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    updated_at: Instant,
}

/// Shared limiter owned by one client. The mutex is only held for the
/// arithmetic, never across a sleep.
#[derive(Debug)]
pub struct RateLimiter {
    capacity: f64,
    period: Duration,
    bucket: Mutex<Bucket>,
}

impl RateLimiter {
    /// Allow `rate_limit` acquisitions per `period`.
    pub fn new(rate_limit: u32, period: Duration) -> Self {
        let capacity = f64::from(rate_limit.max(1));
        let period = if period.is_zero() {
            Duration::from_secs(1)
        } else {
            period
        };

        RateLimiter {
            capacity,
            period,
            bucket: Mutex::new(Bucket {
                tokens: capacity,
                updated_at: Instant::now(),
            }),
        }
    }

    /// Tokens added per second
    fn refill_rate(&self) -> f64 {
        self.capacity / self.period.as_secs_f64()
    }

    /// Take a token if one is available, otherwise report how long to wait.
    fn try_acquire(&self) -> Option<Duration> {
        let rate = self.refill_rate();
        let mut bucket = self.bucket.lock();

        let now = Instant::now();
        let elapsed = now.saturating_duration_since(bucket.updated_at).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * rate).min(self.capacity);
        bucket.updated_at = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            None
        } else {
            Some(Duration::from_secs_f64((1.0 - bucket.tokens) / rate))
        }
    }

    /// Wait until a token is available and consume it.
    pub async fn acquire(&self) {
        while let Some(wait) = self.try_acquire() {
            trace!(wait_ms = wait.as_millis() as u64, "rate limit reached, waiting");
            tokio::time::sleep(wait).await;
        }
    }

    /// Tokens currently in the bucket, after refilling.
    pub fn available(&self) -> f64 {
        let rate = self.refill_rate();
        let mut bucket = self.bucket.lock();
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(bucket.updated_at).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * rate).min(self.capacity);
        bucket.updated_at = now;
        bucket.tokens
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }
}
