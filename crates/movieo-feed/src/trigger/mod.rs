//! Trigger sources.
//!
//! A trigger decides *when* to move; the target it is handed decides *what*
//! moving means. Carousels wrap around, the fetch controller requests the
//! next page.

use std::time::Instant;

mod autoplay;
mod manual;
mod proximity;

pub use autoplay::{AutoplayTimer, DEFAULT_AUTOPLAY_PERIOD};
pub use manual::ManualNavigator;
pub use proximity::ProximityTrigger;

/// Something a trigger can move.
pub trait Advance {
    /// Result of a move (new index, issued request, ...).
    type Effect;

    /// Moves forward by one step.
    fn advance(&mut self) -> Self::Effect;

    /// Moves backward by one step.
    fn retreat(&mut self) -> Self::Effect;

    /// Moves to a position.
    fn jump(&mut self, index: usize) -> Self::Effect;

    /// Returns `true` if [`Self::advance`] would currently do anything.
    fn can_advance(&self) -> bool;
}

/// Lifecycle shared by all trigger sources.
pub trait Trigger {
    /// Activates the trigger, scheduling from `now` where relevant.
    fn start(&mut self, now: Instant);

    /// Deactivates the trigger and drops anything scheduled.
    fn stop(&mut self);

    /// Returns `true` while the trigger may fire.
    fn is_active(&self) -> bool;
}

/// Direction a timer moves its target in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Calls [`Advance::advance`].
    #[default]
    Forward,
    /// Calls [`Advance::retreat`].
    Backward,
}
