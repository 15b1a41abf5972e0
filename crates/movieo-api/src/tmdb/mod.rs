//! Media catalog API client module.
//!
//! Handles HTTP requests to the TMDB API v3 endpoints and retrieves
//! paginated lists, configuration, details, credits and videos.

mod api;
mod client;
mod error;
mod feed;
mod rate_limiter;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{CatalogApi, LocalCatalogApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{CatalogClient, CatalogClientBuilder};
pub use error::{FetchError, FetchResult};
pub use feed::{Chart, Feed};
pub use types::{
    ApiConfiguration, CastMember, Credits, CrewMember, Genre, ImagesConfiguration, MAX_PAGE,
    MediaDetails, MediaItem, MediaKind, MediaRef, Page, Video,
};
