use std::time::{Duration, Instant};

use super::{Advance, Direction, Trigger};

/// Default autoplay period for banner carousels.
pub const DEFAULT_AUTOPLAY_PERIOD: Duration = Duration::from_millis(5000);

/// Fires its target once per period while active and not held.
///
/// Time is passed in by the caller (the event loop), so the timer owns no
/// thread or task. Every state change drops the pending deadline before a
/// new one is scheduled; there is never more than one.
#[derive(Debug, Clone)]
pub struct AutoplayTimer {
    period: Duration,
    direction: Direction,
    active: bool,
    held: bool,
    deadline: Option<Instant>,
}

impl Default for AutoplayTimer {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOPLAY_PERIOD)
    }
}

impl AutoplayTimer {
    /// Creates an inactive forward timer.
    #[must_use]
    pub const fn new(period: Duration) -> Self {
        Self {
            period,
            direction: Direction::Forward,
            active: false,
            held: false,
            deadline: None,
        }
    }

    /// Sets the direction the target is moved in.
    #[must_use]
    pub const fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Period between two firings.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Suspends firing (pointer hover, touch, pause key).
    pub const fn hold(&mut self) {
        self.held = true;
        self.deadline = None;
    }

    /// Ends a hold and schedules a full period from `now`.
    pub fn release(&mut self, now: Instant) {
        self.held = false;
        self.reschedule(now);
    }

    /// Returns `true` while held.
    #[must_use]
    pub const fn is_held(&self) -> bool {
        self.held
    }

    /// Restarts the period from `now` (after manual navigation).
    pub fn restart(&mut self, now: Instant) {
        self.reschedule(now);
    }

    /// Next firing time, if one is scheduled.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left until the next firing.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Fires the target if the deadline has passed.
    ///
    /// Returns the target's effect when it fired. The next deadline is one
    /// period after `now`, so a late poll never fires twice in a row.
    pub fn tick<A: Advance>(&mut self, now: Instant, target: &mut A) -> Option<A::Effect> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.reschedule(now);

        if !target.can_advance() {
            return None;
        }
        Some(match self.direction {
            Direction::Forward => target.advance(),
            Direction::Backward => target.retreat(),
        })
    }

    fn reschedule(&mut self, now: Instant) {
        self.deadline = if self.active && !self.held {
            now.checked_add(self.period)
        } else {
            None
        };
    }
}

impl Trigger for AutoplayTimer {
    fn start(&mut self, now: Instant) {
        self.active = true;
        self.reschedule(now);
    }

    fn stop(&mut self) {
        self.active = false;
        self.deadline = None;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::arithmetic_side_effects)]

    use super::*;
    use crate::trigger::tests::FakeTarget;

    const PERIOD: Duration = Duration::from_millis(5000);

    #[test]
    fn test_inactive_timer_never_fires() {
        // Arrange
        let t0 = Instant::now();
        let mut timer = AutoplayTimer::new(PERIOD);
        let mut target = FakeTarget::default();

        // Act
        let fired = timer.tick(t0 + PERIOD * 3, &mut target);

        // Assert
        assert!(fired.is_none());
        assert_eq!(target.advanced, 0);
    }

    #[test]
    fn test_fires_once_per_period() {
        // Arrange
        let t0 = Instant::now();
        let mut timer = AutoplayTimer::new(PERIOD);
        let mut target = FakeTarget::default();
        timer.start(t0);

        // Act
        timer.tick(t0 + Duration::from_millis(4999), &mut target);
        timer.tick(t0 + PERIOD, &mut target);
        timer.tick(t0 + PERIOD + Duration::from_millis(1), &mut target);
        timer.tick(t0 + PERIOD * 2, &mut target);

        // Assert
        assert_eq!(target.advanced, 2);
    }

    #[test]
    fn test_late_poll_fires_once() {
        // Arrange
        let t0 = Instant::now();
        let mut timer = AutoplayTimer::new(PERIOD);
        let mut target = FakeTarget::default();
        timer.start(t0);

        // Act
        timer.tick(t0 + PERIOD * 4, &mut target);
        timer.tick(t0 + PERIOD * 4, &mut target);

        // Assert
        assert_eq!(target.advanced, 1);
        assert_eq!(timer.deadline(), Some(t0 + PERIOD * 5));
    }

    #[test]
    fn test_hold_suspends_and_release_reschedules() {
        // Arrange
        let t0 = Instant::now();
        let mut timer = AutoplayTimer::new(PERIOD);
        let mut target = FakeTarget::default();
        timer.start(t0);

        // Act
        timer.hold();
        timer.tick(t0 + PERIOD * 2, &mut target);
        timer.release(t0 + PERIOD * 2);
        timer.tick(t0 + PERIOD * 2 + Duration::from_millis(4000), &mut target);
        let after_release = target.advanced;
        timer.tick(t0 + PERIOD * 3, &mut target);

        // Assert
        assert_eq!(after_release, 0);
        assert_eq!(target.advanced, 1);
    }

    #[test]
    fn test_backward_direction_retreats() {
        // Arrange
        let t0 = Instant::now();
        let mut timer = AutoplayTimer::new(PERIOD).with_direction(Direction::Backward);
        let mut target = FakeTarget::default();
        timer.start(t0);

        // Act
        timer.tick(t0 + PERIOD, &mut target);

        // Assert
        assert_eq!(target.retreated, 1);
        assert_eq!(target.advanced, 0);
    }

    #[test]
    fn test_blocked_target_is_skipped_but_rescheduled() {
        // Arrange
        let t0 = Instant::now();
        let mut timer = AutoplayTimer::new(PERIOD);
        let mut target = FakeTarget {
            blocked: true,
            ..FakeTarget::default()
        };
        timer.start(t0);

        // Act
        let fired = timer.tick(t0 + PERIOD, &mut target);

        // Assert
        assert!(fired.is_none());
        assert_eq!(timer.deadline(), Some(t0 + PERIOD * 2));
    }

    #[test]
    fn test_stop_clears_deadline() {
        // Arrange
        let t0 = Instant::now();
        let mut timer = AutoplayTimer::default();
        timer.start(t0);

        // Act
        timer.stop();

        // Assert
        assert!(!timer.is_active());
        assert!(timer.deadline().is_none());
        assert_eq!(timer.period(), DEFAULT_AUTOPLAY_PERIOD);
    }
}
