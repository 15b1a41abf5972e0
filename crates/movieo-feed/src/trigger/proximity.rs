use std::time::Instant;

use super::{Advance, Trigger};

/// Fires when the end of a scrolled list comes within `margin` rows of the
/// viewport.
///
/// Stands in for an intersection observer on a sentinel row. Requests are
/// not repeated while the target reports it cannot advance (fetch in
/// flight, no query, last page reached).
#[derive(Debug, Clone)]
pub struct ProximityTrigger {
    margin: usize,
    active: bool,
}

impl ProximityTrigger {
    /// Creates an active trigger.
    #[must_use]
    pub const fn new(margin: usize) -> Self {
        Self {
            margin,
            active: true,
        }
    }

    /// Rows between the last visible row and the end of the list.
    #[must_use]
    pub const fn distance(offset: usize, viewport_rows: usize, len: usize) -> usize {
        len.saturating_sub(offset.saturating_add(viewport_rows))
    }

    /// Margin in rows.
    #[must_use]
    pub const fn margin(&self) -> usize {
        self.margin
    }

    /// Reports the current distance to the end of the list.
    pub fn observe<A: Advance>(&self, distance: usize, target: &mut A) -> Option<A::Effect> {
        if !self.active || distance > self.margin || !target.can_advance() {
            return None;
        }
        tracing::trace!(distance, margin = self.margin, "sentinel in range");
        Some(target.advance())
    }
}

impl Trigger for ProximityTrigger {
    fn start(&mut self, _now: Instant) {
        self.active = true;
    }

    fn stop(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trigger::tests::FakeTarget;

    #[test]
    fn test_fires_within_margin() {
        // Arrange
        let trigger = ProximityTrigger::new(5);
        let mut target = FakeTarget::default();

        // Act
        let far = trigger.observe(6, &mut target);
        let near = trigger.observe(5, &mut target);

        // Assert
        assert!(far.is_none());
        assert!(near.is_some());
        assert_eq!(target.advanced, 1);
    }

    #[test]
    fn test_respects_can_advance() {
        // Arrange
        let trigger = ProximityTrigger::new(5);
        let mut target = FakeTarget {
            blocked: true,
            ..FakeTarget::default()
        };

        // Act
        let fired = trigger.observe(0, &mut target);

        // Assert
        assert!(fired.is_none());
    }

    #[test]
    fn test_stopped_trigger_is_silent() {
        // Arrange
        let mut trigger = ProximityTrigger::new(5);
        let mut target = FakeTarget::default();
        trigger.stop();

        // Act
        trigger.observe(0, &mut target);
        trigger.start(Instant::now());
        trigger.observe(0, &mut target);

        // Assert
        assert_eq!(target.advanced, 1);
    }

    #[test]
    fn test_distance() {
        // Arrange & Act & Assert
        assert_eq!(ProximityTrigger::distance(0, 10, 40), 30);
        assert_eq!(ProximityTrigger::distance(35, 10, 40), 0);
        assert_eq!(ProximityTrigger::distance(0, 10, 0), 0);
    }
}
