//! Shared, write-once catalog data.
//!
//! The image base URL and the banner list are fetched once at startup and
//! then read from every view. Both slots are [`OnceLock`]s: the first write
//! wins, later writes are rejected and logged.

use std::sync::OnceLock;

use movieo_api::tmdb::{Feed, FetchError, LocalCatalogApi, MediaItem};
use tracing::instrument;

/// Image base URL used when the configuration endpoint is unavailable.
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/original";

/// Rejected store write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The slot already holds a value.
    #[error("{0} is already initialized")]
    AlreadyInitialized(&'static str),
}

/// Catalog data shared by all views.
#[derive(Debug, Default)]
pub struct CatalogStore {
    image_base: OnceLock<String>,
    banners: OnceLock<Vec<MediaItem>>,
}

impl CatalogStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            image_base: OnceLock::new(),
            banners: OnceLock::new(),
        }
    }

    /// Sets the image base URL.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyInitialized`] on a second write.
    pub fn init_image_base(&self, url: impl Into<String>) -> Result<(), StoreError> {
        self.image_base.set(url.into()).map_err(|rejected| {
            tracing::warn!(%rejected, "image base URL already set, ignoring");
            StoreError::AlreadyInitialized("image base URL")
        })
    }

    /// Sets the banner list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyInitialized`] on a second write.
    pub fn init_banners(&self, items: Vec<MediaItem>) -> Result<(), StoreError> {
        self.banners.set(items).map_err(|rejected| {
            tracing::warn!(rejected = rejected.len(), "banner list already set, ignoring");
            StoreError::AlreadyInitialized("banner list")
        })
    }

    /// Image base URL, or [`DEFAULT_IMAGE_BASE_URL`] before initialization.
    #[must_use]
    pub fn image_base(&self) -> &str {
        self.image_base
            .get()
            .map_or(DEFAULT_IMAGE_BASE_URL, String::as_str)
    }

    /// Full URL of an image path such as `/74xTEgt7R36Fpooo50r9T25onhq.jpg`.
    #[must_use]
    pub fn image_url(&self, path: &str) -> String {
        format!("{}{path}", self.image_base())
    }

    /// Banner items (empty before initialization).
    #[must_use]
    pub fn banners(&self) -> &[MediaItem] {
        self.banners.get().map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns `true` once the banner list has been stored.
    #[must_use]
    pub fn is_bootstrapped(&self) -> bool {
        self.banners.get().is_some()
    }

    /// Fetches configuration and trending titles concurrently and stores
    /// them.
    ///
    /// A failed configuration request leaves the image base slot empty, so
    /// readers get the default and a later bootstrap can still fill it.
    /// A failed trending request leaves the banner slot empty so a later
    /// bootstrap can fill it.
    ///
    /// # Errors
    ///
    /// Returns the [`FetchError`] of the trending request.
    #[allow(clippy::future_not_send)]
    #[instrument(skip_all)]
    pub async fn bootstrap(&self, api: &impl LocalCatalogApi) -> Result<(), FetchError> {
        if self.is_bootstrapped() {
            tracing::debug!("catalog store already bootstrapped");
            return Ok(());
        }

        let trending = Feed::Trending;
        let (configuration, banners) =
            futures::join!(api.configuration(), api.fetch_page(&trending, 1));

        if self.image_base.get().is_none() {
            match configuration {
                Ok(configuration) => {
                    if let Err(err) = self.init_image_base(configuration.original_image_base()) {
                        tracing::debug!(error = %err, "image base URL kept");
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "configuration unavailable, using default image base");
                }
            }
        }

        let banners = banners?.results;
        tracing::info!(banners = banners.len(), base = self.image_base(), "catalog store ready");
        if let Err(err) = self.init_banners(banners) {
            tracing::debug!(error = %err, "banner list kept");
        }
        Ok(())
    }
}
