//! `CatalogApi` trait definition.
#![allow(clippy::future_not_send)]

use super::error::FetchResult;
use super::feed::Feed;
use super::types::{ApiConfiguration, Credits, MediaDetails, MediaItem, MediaRef, Page, Video};

/// Media catalog API.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(CatalogApi: Send)]
pub trait LocalCatalogApi {
    /// Fetches one page of a list resource.
    ///
    /// Items without a `media_type` inherit the kind implied by `feed`.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`](super::FetchError) on transport, HTTP or decode failure.
    async fn fetch_page(&self, feed: &Feed, page: u32) -> FetchResult<Page<MediaItem>>;

    /// Fetches the API configuration (image base URL).
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`](super::FetchError) on transport, HTTP or decode failure.
    async fn configuration(&self) -> FetchResult<ApiConfiguration>;

    /// Fetches movie or series details.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`](super::FetchError) on transport, HTTP or decode failure.
    async fn details(&self, media: MediaRef) -> FetchResult<MediaDetails>;

    /// Fetches cast and crew.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`](super::FetchError) on transport, HTTP or decode failure.
    async fn credits(&self, media: MediaRef) -> FetchResult<Credits>;

    /// Fetches trailers, teasers and clips.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`](super::FetchError) on transport, HTTP or decode failure.
    async fn videos(&self, media: MediaRef) -> FetchResult<Vec<Video>>;
}
