//! Fixed-window request rate limiter.
//!
//! All concurrent annotation tasks share one counter; `admit` serializes
//! the read-then-increment under a mutex so the ceiling cannot be exceeded
//! by interleaved callers. Bursts at window boundaries are accepted.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};
use tracing::debug;

/// Length of one rate-limit window.
const WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug)]
struct WindowState {
    count: u32,
    window_start: Instant,
}

/// Shared fixed-window rate limiter.
///
/// Cloning shares the underlying counter; every client holding a clone
/// contends on the same window.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    ceiling: u32,
    state: Arc<Mutex<WindowState>>,
}

impl RateLimiter {
    /// Create a limiter admitting at most `reqs_per_sec` requests per
    /// one-second window. A ceiling of zero is treated as one.
    pub fn new(reqs_per_sec: u32) -> Self {
        Self {
            ceiling: reqs_per_sec.max(1),
            state: Arc::new(Mutex::new(WindowState {
                count: 0,
                window_start: Instant::now(),
            })),
        }
    }

    /// Block until one more request may be issued, then reserve the slot.
    ///
    /// The lock is held across the sleep on purpose: callers arriving while
    /// the window is exhausted queue behind the sleeper instead of racing
    /// for the reset.
    pub async fn admit(&self) {
        let mut state = self.state.lock().await;
        if state.count >= self.ceiling {
            let elapsed = state.window_start.elapsed();
            if elapsed < WINDOW {
                let wait = WINDOW - elapsed;
                debug!("rate limit window exhausted, waiting {:?}", wait);
                tokio::time::sleep(wait).await;
            }
            state.window_start = Instant::now();
            state.count = 0;
        }
        state.count += 1;
    }
}
