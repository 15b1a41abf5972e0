use std::time::Instant;

use super::{Advance, Trigger};

/// Previous / next / jump-to-index from user input.
#[derive(Debug, Clone)]
pub struct ManualNavigator {
    active: bool,
}

impl Default for ManualNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualNavigator {
    /// Creates an active navigator.
    #[must_use]
    pub const fn new() -> Self {
        Self { active: true }
    }

    /// Moves the target forward.
    pub fn next<A: Advance>(&self, target: &mut A) -> Option<A::Effect> {
        self.active.then(|| target.advance())
    }

    /// Moves the target backward.
    pub fn previous<A: Advance>(&self, target: &mut A) -> Option<A::Effect> {
        self.active.then(|| target.retreat())
    }

    /// Moves the target to `index`.
    pub fn jump_to<A: Advance>(&self, index: usize, target: &mut A) -> Option<A::Effect> {
        self.active.then(|| target.jump(index))
    }
}

impl Trigger for ManualNavigator {
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
    fn test_forwards_to_target() {
        // Arrange
        let nav = ManualNavigator::new();
        let mut target = FakeTarget::default();

        // Act
        nav.next(&mut target);
        nav.previous(&mut target);
        nav.jump_to(3, &mut target);

        // Assert
        assert_eq!(target.advanced, 1);
        assert_eq!(target.retreated, 1);
        assert_eq!(target.jumps, vec![3]);
    }

    #[test]
    fn test_stopped_navigator_ignores_input() {
        // Arrange
        let mut nav = ManualNavigator::default();
        let mut target = FakeTarget::default();
        nav.stop();

        // Act
        let effect = nav.next(&mut target);

        // Assert
        assert!(effect.is_none());
        assert!(!nav.is_active());
        assert_eq!(target.advanced, 0);
    }
}
