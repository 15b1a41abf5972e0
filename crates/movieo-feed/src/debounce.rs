//! Trailing-edge debouncing for typed input.

use std::time::{Duration, Instant};

/// Default quiet window before a search query is applied.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Holds the latest value until no new value arrived for one window.
///
/// Only the last pushed value is ever released. Dropping the debouncer or
/// calling [`Debouncer::cancel`] discards a pending value.
#[derive(Debug, Clone)]
pub struct Debouncer<V> {
    window: Duration,
    pending: Option<(V, Instant)>,
}

impl<V> Default for Debouncer<V> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl<V> Debouncer<V> {
    /// Creates a debouncer with the given quiet window.
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Replaces any pending value and restarts the window from `now`.
    pub fn push(&mut self, value: V, now: Instant) {
        let deadline = now.checked_add(self.window).unwrap_or(now);
        self.pending = Some((value, deadline));
    }

    /// Releases the pending value once its window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<V> {
        match self.pending.take() {
            Some((value, deadline)) if now >= deadline => Some(value),
            other => {
                self.pending = other;
                None
            }
        }
    }

    /// Discards the pending value.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Returns `true` while a value is waiting.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time until the pending value is released.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, deadline)| deadline.saturating_duration_since(now))
    }
}
