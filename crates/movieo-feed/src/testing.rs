//! Test doubles shared by the unit tests of this crate.
#![allow(clippy::unwrap_used)]
#![allow(clippy::missing_panics_doc)]
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use movieo_api::tmdb::{
    ApiConfiguration, Credits, Feed, FetchError, FetchResult, LocalCatalogApi, MediaDetails,
    MediaItem, MediaRef, Page, Video,
};

pub fn movie(id: u64) -> MediaItem {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "media_type": "movie",
        "title": format!("Movie {id}"),
        "release_date": "2022-03-01",
    }))
    .unwrap()
}

pub fn tv(id: u64) -> MediaItem {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "media_type": "tv",
        "name": format!("Series {id}"),
        "first_air_date": "2008-01-20",
    }))
    .unwrap()
}

pub fn ids(items: &[MediaItem]) -> Vec<u64> {
    items.iter().map(|item| item.id).collect()
}

pub fn page_of(page: u32, items: Vec<MediaItem>, total_pages: u32) -> Page<MediaItem> {
    Page {
        page,
        results: items,
        total_pages,
        total_results: 0,
    }
}

fn not_mocked(what: &str) -> FetchError {
    FetchError::UpstreamError {
        status: 404,
        message: format!("no mock for {what}"),
    }
}

/// In-memory catalog keyed by `(feed, page)`.
pub struct MockCatalogApi {
    pages: Mutex<HashMap<(String, u32), FetchResult<Page<MediaItem>>>>,
    pub configuration: FetchResult<ApiConfiguration>,
    pub details: FetchResult<MediaDetails>,
    pub credits: FetchResult<Credits>,
    pub videos: FetchResult<Vec<Video>>,
    pub page_calls: AtomicU32,
    pub requested: Mutex<Vec<(String, u32)>>,
}

impl MockCatalogApi {
    pub fn new() -> Self {
        Self {
            pages: Mutex::new(HashMap::new()),
            configuration: Err(not_mocked("configuration")),
            details: Err(not_mocked("details")),
            credits: Err(not_mocked("credits")),
            videos: Err(not_mocked("videos")),
            page_calls: AtomicU32::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn with_page(self, feed: &Feed, page: u32, result: FetchResult<Page<MediaItem>>) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert((feed.to_string(), page), result);
        self
    }

    pub fn set_page(&self, feed: &Feed, page: u32, result: FetchResult<Page<MediaItem>>) {
        self.pages
            .lock()
            .unwrap()
            .insert((feed.to_string(), page), result);
    }

    pub fn calls(&self) -> u32 {
        self.page_calls.load(Ordering::SeqCst)
    }
}

impl LocalCatalogApi for MockCatalogApi {
    async fn fetch_page(&self, feed: &Feed, page: u32) -> FetchResult<Page<MediaItem>> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        let key = (feed.to_string(), page);
        self.requested.lock().unwrap().push(key.clone());
        self.pages
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Err(not_mocked(&format!("{feed} page {page}"))))
    }

    async fn configuration(&self) -> FetchResult<ApiConfiguration> {
        self.configuration.clone()
    }

    async fn details(&self, _media: MediaRef) -> FetchResult<MediaDetails> {
        self.details.clone()
    }

    async fn credits(&self, _media: MediaRef) -> FetchResult<Credits> {
        self.credits.clone()
    }

    async fn videos(&self, _media: MediaRef) -> FetchResult<Vec<Video>> {
        self.videos.clone()
    }
}
