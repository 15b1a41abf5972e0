//! Request pacing for the catalog API.

use std::time::{Duration, Instant};

/// Default minimum interval between requests (~40 req/s).
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(25);

/// Minimum-gap pacer shared by all requests of one client.
///
/// The catalog allows roughly 40 requests per second. Home and detail
/// views fan out several requests at once, so calls are spaced out here
/// rather than by callers.
#[derive(Debug)]
pub struct RequestPacer {
    /// Minimum gap between two request starts.
    min_interval: Duration,
    /// Start of the previous request.
    last_request: Option<Instant>,
}

impl RequestPacer {
    /// Creates a pacer with the given minimum gap.
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: None,
        }
    }

    /// Creates a pacer with the default gap (25ms).
    pub(crate) const fn default_interval() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }

    /// Sleeps until the next request may start and returns the time slept.
    pub async fn wait(&mut self) -> Duration {
        let delay = self.last_request.map_or(Duration::ZERO, |last| {
            self.min_interval.saturating_sub(last.elapsed())
        });

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.last_request = Some(Instant::now());
        delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_request_does_not_wait() {
        // Arrange
        let mut pacer = RequestPacer::new(Duration::from_secs(1));

        // Act
        let slept = pacer.wait().await;

        // Assert
        assert_eq!(slept, Duration::ZERO);
    }

    #[tokio::test]
    async fn test_second_request_waits_for_gap() {
        // Arrange
        let mut pacer = RequestPacer::new(Duration::from_millis(50));

        // Act
        let start = Instant::now();
        pacer.wait().await;
        pacer.wait().await;

        // Assert
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_zero_gap_never_sleeps() {
        // Arrange
        let mut pacer = RequestPacer::new(Duration::ZERO);

        // Act
        pacer.wait().await;
        let slept = pacer.wait().await;

        // Assert
        assert_eq!(slept, Duration::ZERO);
        assert!(pacer.last_request.is_some());
    }

    #[test]
    fn test_default_interval() {
        // Arrange & Act
        let pacer = RequestPacer::default_interval();

        // Assert
        assert_eq!(pacer.min_interval, Duration::from_millis(25));
    }
}
