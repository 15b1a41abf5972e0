//! Feed state for movieo.
//!
//! Holds the paginated fetch controller and everything that drives or
//! renders it: result accumulation, trigger sources (autoplay, scroll
//! proximity, manual navigation), carousels, input debouncing, the shared
//! catalog store and the home/detail view models.

/// Ordered, de-duplicated result sets.
pub mod accumulator;

/// Bounded carousels with autoplay.
pub mod carousel;

/// Paginated fetch controller.
pub mod controller;

/// Trailing-edge input debouncing.
pub mod debounce;

/// Detail view assembly.
pub mod details;

/// Home page rails.
pub mod home;

/// Shared, write-once catalog data.
pub mod store;

/// Trigger sources that drive pagination and carousels.
pub mod trigger;

#[cfg(test)]
mod testing;

pub use accumulator::{Accumulator, ItemId, Keyed, merge};
pub use carousel::{BannerCarousel, Carousel};
pub use controller::{
    ErrorPolicy, FeedKey, FeedView, FetchController, FetchState, Outcome, PageRequest, Recovery,
};
pub use debounce::{DEFAULT_DEBOUNCE, Debouncer};
pub use details::{DetailView, format_release_date};
pub use home::{HomeRails, Rail};
pub use store::{CatalogStore, DEFAULT_IMAGE_BASE_URL, StoreError};
pub use trigger::{
    Advance, AutoplayTimer, DEFAULT_AUTOPLAY_PERIOD, Direction, ManualNavigator, ProximityTrigger,
    Trigger,
};
