use crate::traits::Clock;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Tokio-backed clock. `now_millis` counts from clock construction.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Deterministic clock for tests: `sleep` returns immediately, advances
/// virtual time by the requested amount and records it.
pub struct ManualClock {
    now_ms: AtomicU64,
    sleeps: Mutex<Vec<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now_ms: AtomicU64::new(0),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    /// Moves virtual time forward without recording a sleep.
    pub fn advance(&self, ms: u64) {
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
    }

    /// Every sleep duration requested so far, in call order (milliseconds).
    pub fn recorded_sleeps(&self) -> Vec<u64> {
        self.sleeps_guard().clone()
    }

    /// Sum of all requested sleep durations in milliseconds.
    pub fn total_slept_ms(&self) -> u64 {
        self.sleeps_guard().iter().sum()
    }

    fn sleeps_guard(&self) -> MutexGuard<'_, Vec<u64>> {
        self.sleeps.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }

    async fn sleep(&self, duration: Duration) {
        let ms = duration.as_millis() as u64;
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
        self.sleeps_guard().push(ms);
    }
}
