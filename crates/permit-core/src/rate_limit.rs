//! Sliding-window admission control
//!
//! One window is shared by every request the process handles; there is no
//! per-client partitioning. The check-then-record step runs under a mutex so
//! it stays atomic on a multi-threaded runtime.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub const DEFAULT_CAPACITY: usize = 5;
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(1000);

/// Source of "now" for the limiter
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Used to drive the window in tests.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(|e| e.into_inner());
        *offset += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = self.offset.lock().unwrap_or_else(|e| e.into_inner());
        self.origin + *offset
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    Rejected,
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted)
    }
}

pub struct RateLimiter {
    capacity: usize,
    window: Duration,
    clock: Arc<dyn Clock>,
    admitted: Mutex<VecDeque<Instant>>,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("capacity", &self.capacity)
            .field("window", &self.window)
            .field("in_window", &self.in_window())
            .finish()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_WINDOW)
    }
}

impl RateLimiter {
    pub fn new(capacity: usize, window: Duration) -> Self {
        Self::with_clock(capacity, window, Arc::new(SystemClock))
    }

    pub fn with_clock(capacity: usize, window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            capacity,
            window,
            clock,
            admitted: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Admit the request and record it, or reject it without recording.
    pub fn check(&self) -> Admission {
        let mut admitted = self.admitted.lock().unwrap_or_else(|e| e.into_inner());
        // Read under the lock so pushes happen in clock order
        let now = self.clock.now();

        // Timestamps are non-decreasing, so expired entries form a prefix.
        if let Some(cutoff) = now.checked_sub(self.window) {
            while admitted.front().is_some_and(|&t| t < cutoff) {
                admitted.pop_front();
            }
        }

        if admitted.len() >= self.capacity {
            return Admission::Rejected;
        }
        admitted.push_back(now);
        Admission::Admitted
    }

    /// Admissions currently counted against the window (not pruned).
    pub fn in_window(&self) -> usize {
        self.admitted.lock().map(|a| a.len()).unwrap_or_default()
    }

    /// Client-facing explanation used in 429 responses
    pub fn rejection_message(&self) -> String {
        let per = if self.window == Duration::from_secs(1) {
            "second".to_string()
        } else {
            format!("{}ms", self.window.as_millis())
        };
        format!(
            "Rate limit exceeded. Only {} requests per {} allowed.",
            self.capacity, per
        )
    }
}
