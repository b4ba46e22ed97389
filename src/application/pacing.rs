//! Fixed inter-call delay for rate-limited exchange endpoints.

use std::time::Duration;

use tokio::time::sleep;

/// Sleeps for a fixed interval after rate-limited calls.
///
/// There is no backoff: every pause is the same length.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    /// Create a pacer with the given delay.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Wait out the configured delay.
    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn pause_waits_for_configured_delay() {
        let pacer = Pacer::new(Duration::from_secs(3));
        let start = tokio::time::Instant::now();
        pacer.pause().await;
        assert!(start.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test]
    async fn zero_delay_returns_immediately() {
        let pacer = Pacer::new(Duration::ZERO);
        let start = std::time::Instant::now();
        pacer.pause().await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
