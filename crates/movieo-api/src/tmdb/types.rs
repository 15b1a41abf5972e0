//! Catalog API response types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Highest page number the catalog API will serve for any list endpoint.
pub const MAX_PAGE: u32 = 500;

// --- Media kind ---

/// Media kind tag carried by list items (`media_type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Feature film.
    Movie,
    /// TV series.
    Tv,
    /// Cast or crew member (only returned by multi search).
    Person,
}

impl MediaKind {
    /// Path segment used by the catalog API (`movie`, `tv`, `person`).
    #[must_use]
    pub const fn as_path(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
            Self::Person => "person",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" | "movies" => Ok(Self::Movie),
            "tv" | "show" | "shows" => Ok(Self::Tv),
            "person" | "people" => Ok(Self::Person),
            other => Err(format!("unknown media kind: {other}")),
        }
    }
}

/// Reference to a single movie or TV series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MediaRef {
    /// Media kind.
    pub kind: MediaKind,
    /// Catalog ID.
    pub id: u64,
}

impl MediaRef {
    /// Creates a reference.
    #[must_use]
    pub const fn new(kind: MediaKind, id: u64) -> Self {
        Self { kind, id }
    }

    /// Resource path (`movie/603`).
    #[must_use]
    pub fn path(&self) -> String {
        format!("{}/{}", self.kind, self.id)
    }
}

// --- Lists ---

/// One page of a paginated list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    /// Current page number.
    #[serde(default = "first_page")]
    pub page: u32,
    /// Items on this page.
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    /// Total number of pages reported upstream.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results reported upstream.
    #[serde(default)]
    pub total_results: u32,
}

const fn first_page() -> u32 {
    1
}

impl<T> Page<T> {
    /// Total pages, capped at the highest page the API serves.
    ///
    /// A report of zero pages counts as one so the first page stays the
    /// upper bound for pagination.
    #[must_use]
    pub fn bounded_total_pages(&self) -> u32 {
        self.total_pages.clamp(1, MAX_PAGE)
    }
}

/// A movie, TV series or person in any list response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MediaItem {
    /// Catalog ID (unique per media kind).
    pub id: u64,
    /// Media kind; absent on single-kind endpoints (discover, charts).
    #[serde(default)]
    pub media_type: Option<MediaKind>,
    /// Movie title.
    #[serde(default)]
    pub title: Option<String>,
    /// TV series or person name.
    #[serde(default)]
    pub name: Option<String>,
    /// Original movie title.
    #[serde(default)]
    pub original_title: Option<String>,
    /// Original series name.
    #[serde(default)]
    pub original_name: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Movie release date (YYYY-MM-DD).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Series first air date (YYYY-MM-DD).
    #[serde(default)]
    pub first_air_date: Option<String>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Adult flag.
    #[serde(default)]
    pub adult: bool,
}

impl MediaItem {
    /// Title for display: movie title, else series/person name.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }

    /// Release date for movies, first air date for series.
    #[must_use]
    pub fn date(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .or(self.first_air_date.as_deref())
            .filter(|d| !d.is_empty())
    }

    /// Four-digit year of [`Self::date`].
    #[must_use]
    pub fn year(&self) -> Option<&str> {
        self.date().and_then(|d| d.get(..4))
    }

    /// Fills `media_type` from the feed when the response omitted it.
    #[must_use]
    pub fn with_default_kind(mut self, kind: Option<MediaKind>) -> Self {
        if self.media_type.is_none() {
            self.media_type = kind;
        }
        self
    }

    /// Reference for detail lookups (people have none).
    #[must_use]
    pub fn media_ref(&self) -> Option<MediaRef> {
        match self.media_type {
            Some(kind @ (MediaKind::Movie | MediaKind::Tv)) => Some(MediaRef::new(kind, self.id)),
            _ => None,
        }
    }
}

// --- Configuration ---

/// Response from the `configuration` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfiguration {
    /// Image hosting configuration.
    pub images: ImagesConfiguration,
}

/// Image hosting section of the configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ImagesConfiguration {
    /// HTTP image base URL.
    #[serde(default)]
    pub base_url: String,
    /// HTTPS image base URL (ends with `/`).
    pub secure_base_url: String,
    /// Available backdrop sizes.
    #[serde(default)]
    pub backdrop_sizes: Vec<String>,
    /// Available poster sizes.
    #[serde(default)]
    pub poster_sizes: Vec<String>,
}

impl ApiConfiguration {
    /// Base URL for full-resolution images.
    #[must_use]
    pub fn original_image_base(&self) -> String {
        format!("{}original", self.images.secure_base_url)
    }
}

// --- Details ---

/// Response from `movie/{id}` or `tv/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaDetails {
    /// Catalog ID.
    pub id: u64,
    /// Movie title.
    #[serde(default)]
    pub title: Option<String>,
    /// Series name.
    #[serde(default)]
    pub name: Option<String>,
    /// Tagline.
    #[serde(default)]
    pub tagline: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Status (e.g. "Released", "Returning Series").
    #[serde(default)]
    pub status: Option<String>,
    /// Movie release date.
    #[serde(default)]
    pub release_date: Option<String>,
    /// Series first air date.
    #[serde(default)]
    pub first_air_date: Option<String>,
    /// Movie runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Series episode runtimes in minutes.
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    /// Number of seasons (series only).
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
    /// Number of episodes (series only).
    #[serde(default)]
    pub number_of_episodes: Option<u32>,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

impl MediaDetails {
    /// Title for display.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }
}

/// Genre entry.
#[derive(Debug, Clone, Deserialize)]
pub struct Genre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

// --- Credits ---

/// Response from `{kind}/{id}/credits`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credits {
    /// Cast in billing order.
    #[serde(default)]
    pub cast: Vec<CastMember>,
    /// Crew.
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

/// A cast credit.
#[derive(Debug, Clone, Deserialize)]
pub struct CastMember {
    /// Person ID.
    pub id: u64,
    /// Person name.
    pub name: String,
    /// Character played.
    #[serde(default)]
    pub character: Option<String>,
    /// Profile image path.
    #[serde(default)]
    pub profile_path: Option<String>,
    /// Billing order.
    #[serde(default)]
    pub order: u32,
}

/// A crew credit.
#[derive(Debug, Clone, Deserialize)]
pub struct CrewMember {
    /// Person ID.
    pub id: u64,
    /// Person name.
    pub name: String,
    /// Job title (e.g. "Director", "Writer").
    #[serde(default)]
    pub job: Option<String>,
    /// Department.
    #[serde(default)]
    pub department: Option<String>,
}

// --- Videos ---

/// Response from `{kind}/{id}/videos`.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoList {
    /// Videos.
    #[serde(default)]
    pub results: Vec<Video>,
}

/// A trailer, teaser or clip hosted on a video site.
#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    /// Site-specific key (YouTube video ID).
    pub key: String,
    /// Hosting site (e.g. "YouTube").
    pub site: String,
    /// Video type (e.g. "Trailer", "Teaser").
    #[serde(rename = "type")]
    pub kind: String,
    /// Video name.
    #[serde(default)]
    pub name: String,
    /// Whether the video is official.
    #[serde(default)]
    pub official: bool,
}

// --- Error Response ---

/// Catalog API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogErrorResponse {
    /// Upstream error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[serde(default)]
    pub success: bool,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_media_kind_from_str() {
        // Arrange & Act & Assert
        assert_eq!("movie".parse::<MediaKind>().unwrap(), MediaKind::Movie);
        assert_eq!("TV".parse::<MediaKind>().unwrap(), MediaKind::Tv);
        assert!("anime".parse::<MediaKind>().is_err());
    }

    #[test]
    fn test_display_title_prefers_title() {
        // Arrange
        let json = r#"{"id":1,"title":"The Batman","name":"ignored"}"#;

        // Act
        let item: MediaItem = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(item.display_title(), "The Batman");
    }

    #[test]
    fn test_display_title_falls_back_to_name() {
        // Arrange
        let json = r#"{"id":2,"name":"Severance","media_type":"tv","first_air_date":"2022-02-17"}"#;

        // Act
        let item: MediaItem = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(item.display_title(), "Severance");
        assert_eq!(item.year(), Some("2022"));
        assert_eq!(item.media_ref(), Some(MediaRef::new(MediaKind::Tv, 2)));
    }

    #[test]
    fn test_with_default_kind_keeps_explicit_kind() {
        // Arrange
        let json = r#"{"id":3,"media_type":"person","name":"Zoë Kravitz"}"#;
        let item: MediaItem = serde_json::from_str(json).unwrap();

        // Act
        let item = item.with_default_kind(Some(MediaKind::Movie));

        // Assert
        assert_eq!(item.media_type, Some(MediaKind::Person));
        assert!(item.media_ref().is_none());
    }

    #[test]
    fn test_empty_date_is_none() {
        // Arrange
        let json = r#"{"id":4,"title":"Untitled","release_date":""}"#;

        // Act
        let item: MediaItem = serde_json::from_str(json).unwrap();

        // Assert
        assert!(item.date().is_none());
        assert!(item.year().is_none());
    }

    #[test]
    fn test_bounded_total_pages() {
        // Arrange
        let empty: Page<MediaItem> =
            serde_json::from_str(r#"{"page":1,"results":[],"total_pages":0,"total_results":0}"#)
                .unwrap();
        let huge: Page<MediaItem> =
            serde_json::from_str(r#"{"page":1,"results":[],"total_pages":44186}"#).unwrap();

        // Act & Assert
        assert_eq!(empty.bounded_total_pages(), 1);
        assert_eq!(huge.bounded_total_pages(), MAX_PAGE);
    }

    #[test]
    fn test_original_image_base() {
        // Arrange
        let json = r#"{"images":{"secure_base_url":"https://image.tmdb.org/t/p/"}}"#;

        // Act
        let config: ApiConfiguration = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(
            config.original_image_base(),
            "https://image.tmdb.org/t/p/original"
        );
    }

    #[test]
    fn test_media_ref_path() {
        // Arrange
        let media = MediaRef::new(MediaKind::Movie, 414_906);

        // Act & Assert
        assert_eq!(media.path(), "movie/414906");
    }
}
