//! Bounded carousels.

use std::time::{Duration, Instant};

use crate::trigger::{Advance, AutoplayTimer, ManualNavigator, Trigger};

/// Index after `index` in a ring of `len` slots.
const fn wrap_next(index: usize, len: usize) -> usize {
    match index.checked_add(1) {
        Some(next) if next < len => next,
        _ => 0,
    }
}

/// Index before `index` in a ring of `len` slots.
const fn wrap_previous(index: usize, len: usize) -> usize {
    match index.checked_sub(1) {
        Some(previous) => previous,
        None => len.saturating_sub(1),
    }
}

/// A fixed list of items with a wrapping cursor.
#[derive(Debug, Clone)]
pub struct Carousel<T> {
    items: Vec<T>,
    index: usize,
}

impl<T> Default for Carousel<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> Carousel<T> {
    /// Creates a carousel positioned on the first item.
    #[must_use]
    pub const fn new(items: Vec<T>) -> Self {
        Self { items, index: 0 }
    }

    /// Replaces the items and moves back to the first one.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.index = 0;
    }

    /// Moves to the next item, wrapping to the first.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> usize {
        if !self.items.is_empty() {
            self.index = wrap_next(self.index, self.items.len());
        }
        self.index
    }

    /// Moves to the previous item, wrapping to the last.
    pub fn previous(&mut self) -> usize {
        if !self.items.is_empty() {
            self.index = wrap_previous(self.index, self.items.len());
        }
        self.index
    }

    /// Moves to `index`, clamped to the last item.
    pub fn go_to(&mut self, index: usize) -> usize {
        self.index = index.min(self.items.len().saturating_sub(1));
        self.index
    }

    /// Item under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&T> {
        self.items.get(self.index)
    }

    /// Cursor position.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// All items.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Advance for Carousel<T> {
    type Effect = usize;

    fn advance(&mut self) -> usize {
        self.next()
    }

    fn retreat(&mut self) -> usize {
        self.previous()
    }

    fn jump(&mut self, index: usize) -> usize {
        self.go_to(index)
    }

    fn can_advance(&self) -> bool {
        self.items.len() > 1
    }
}

/// Hero banner: a carousel that autoplays and can be paused.
///
/// Manual navigation restarts the autoplay period so a slide the user just
/// picked is shown for a full period.
#[derive(Debug, Clone)]
pub struct BannerCarousel<T> {
    carousel: Carousel<T>,
    timer: AutoplayTimer,
    manual: ManualNavigator,
}

impl<T> BannerCarousel<T> {
    /// Creates a banner; autoplay starts with [`Self::start`].
    #[must_use]
    pub const fn new(items: Vec<T>, period: Duration) -> Self {
        Self {
            carousel: Carousel::new(items),
            timer: AutoplayTimer::new(period),
            manual: ManualNavigator::new(),
        }
    }

    /// Starts autoplay.
    pub fn start(&mut self, now: Instant) {
        self.timer.start(now);
        self.manual.start(now);
    }

    /// Stops autoplay and input handling.
    pub fn stop(&mut self) {
        self.timer.stop();
        self.manual.stop();
    }

    /// Replaces the slides and restarts the period.
    pub fn set_items(&mut self, items: Vec<T>, now: Instant) {
        self.carousel.set_items(items);
        self.timer.restart(now);
    }

    /// Shows the next slide.
    pub fn next(&mut self, now: Instant) -> Option<usize> {
        let index = self.manual.next(&mut self.carousel)?;
        self.timer.restart(now);
        Some(index)
    }

    /// Shows the previous slide.
    pub fn previous(&mut self, now: Instant) -> Option<usize> {
        let index = self.manual.previous(&mut self.carousel)?;
        self.timer.restart(now);
        Some(index)
    }

    /// Shows slide `index` (clamped).
    pub fn go_to(&mut self, index: usize, now: Instant) -> Option<usize> {
        let index = self.manual.jump_to(index, &mut self.carousel)?;
        self.timer.restart(now);
        Some(index)
    }

    /// Pauses autoplay.
    pub const fn pause(&mut self) {
        self.timer.hold();
    }

    /// Resumes autoplay with a full period from `now`.
    pub fn resume(&mut self, now: Instant) {
        self.timer.release(now);
    }

    /// Toggles between paused and playing.
    pub fn toggle_pause(&mut self, now: Instant) {
        if self.timer.is_held() {
            self.resume(now);
        } else {
            self.pause();
        }
    }

    /// Returns `true` while paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.timer.is_held()
    }

    /// Advances the slide if the period elapsed. Returns the new index.
    pub fn tick(&mut self, now: Instant) -> Option<usize> {
        self.timer.tick(now, &mut self.carousel)
    }

    /// Time until the next automatic advance.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.timer.remaining(now)
    }

    /// Slide on screen.
    #[must_use]
    pub fn current(&self) -> Option<&T> {
        self.carousel.current()
    }

    /// Underlying carousel.
    #[must_use]
    pub const fn carousel(&self) -> &Carousel<T> {
        &self.carousel
    }
}
