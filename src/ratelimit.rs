//! Token-bucket rate limiting for embedding provider calls.
//!
//! Pacing policy lives here so the embedding logic never sleeps inline.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};

/// A token bucket that mints one token per `refill_interval`.
///
/// The bucket starts full, so the first `capacity` acquisitions proceed
/// immediately; later acquisitions wait for refills. A zero interval
/// disables pacing entirely.
pub struct TokenBucket {
    capacity: f64,
    refill_interval: Duration,
    state: Mutex<BucketState>,
}

struct BucketState {
    available: f64,
    last_refill: Instant,
}

impl TokenBucket {
    /// Create a bucket holding at most `capacity` tokens, refilled at one
    /// token per `refill_interval`.
    pub fn new(capacity: u32, refill_interval: Duration) -> Self {
        let capacity = f64::from(capacity.max(1));
        Self {
            capacity,
            refill_interval,
            state: Mutex::new(BucketState { available: capacity, last_refill: Instant::now() }),
        }
    }

    /// Acquire one token, waiting for a refill if the bucket is empty.
    pub async fn acquire(&self) {
        if self.refill_interval.is_zero() {
            return;
        }

        loop {
            let wait = {
                let mut state = self.state.lock().await;
                let elapsed = state.last_refill.elapsed();
                let minted = elapsed.as_secs_f64() / self.refill_interval.as_secs_f64();
                state.available = (state.available + minted).min(self.capacity);
                state.last_refill = Instant::now();

                if state.available >= 1.0 {
                    state.available -= 1.0;
                    return;
                }
                self.refill_interval.mul_f64(1.0 - state.available)
            };
            sleep(wait).await;
        }
    }
}
