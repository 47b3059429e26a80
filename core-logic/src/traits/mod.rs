use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Time source injected into every component that waits.
///
/// Production code uses the tokio-backed system clock; tests substitute a
/// manual clock so retry delays, pacing and the inter-cycle countdown run
/// without real waiting.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Milliseconds elapsed since a fixed per-clock origin. Monotonic.
    fn now_millis(&self) -> u64;

    /// Suspends the current task for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Line-oriented input collaborator.
///
/// Covers interactive prompts and line files alike; consumers only ever see
/// the collected lines, trimmed and with blanks removed.
pub trait InputSource: Send {
    /// Reads lines until the source is exhausted (for interactive sources,
    /// until the first empty line).
    fn read_lines(&mut self, prompt: &str) -> Result<Vec<String>>;
}
