//! Detail view assembly.

use chrono::{Datelike, NaiveDate};
use movieo_api::tmdb::{
    CastMember, Credits, Feed, FetchResult, LocalCatalogApi, MediaDetails, MediaItem, MediaKind,
    MediaRef, Video,
};
use tracing::instrument;

/// Placeholder for a missing or unparseable release date.
const NO_RELEASE_DATE: &str = "Release date not available";

/// Placeholder for missing credits.
const NOT_AVAILABLE: &str = "N/A";

/// Watch URL prefix for YouTube-hosted trailers.
const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Everything shown on a movie or series page.
#[derive(Debug, Clone)]
pub struct DetailView {
    media: MediaRef,
    details: MediaDetails,
    credits: Credits,
    videos: Vec<Video>,
    similar: Vec<MediaItem>,
    recommendations: Vec<MediaItem>,
}

impl DetailView {
    /// Fetches details, credits, videos, similar and recommended titles
    /// concurrently.
    ///
    /// Only the details request is required; the other parts fall back to
    /// empty lists.
    ///
    /// # Errors
    ///
    /// Returns the [`FetchError`](movieo_api::tmdb::FetchError) of the
    /// details request.
    #[allow(clippy::future_not_send)]
    #[instrument(skip_all, fields(media = %media.path()))]
    pub async fn load(api: &impl LocalCatalogApi, media: MediaRef) -> FetchResult<Self> {
        let similar_feed = Feed::Similar(media);
        let recommendations_feed = Feed::Recommendations(media);

        let (details, credits, videos, similar, recommendations) = futures::join!(
            api.details(media),
            api.credits(media),
            api.videos(media),
            api.fetch_page(&similar_feed, 1),
            api.fetch_page(&recommendations_feed, 1),
        );

        let details = details?;
        let credits = credits.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "credits unavailable");
            Credits::default()
        });
        let videos = videos.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "videos unavailable");
            Vec::new()
        });
        let similar = similar.map(|page| page.results).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "similar titles unavailable");
            Vec::new()
        });
        let recommendations = recommendations
            .map(|page| page.results)
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "recommendations unavailable");
                Vec::new()
            });

        Ok(Self {
            media,
            details,
            credits,
            videos,
            similar,
            recommendations,
        })
    }

    /// Movie or series shown.
    #[must_use]
    pub const fn media(&self) -> MediaRef {
        self.media
    }

    /// Raw details.
    #[must_use]
    pub const fn details(&self) -> &MediaDetails {
        &self.details
    }

    /// Display title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.details.display_title()
    }

    /// Runtime as `(hours, minutes)`; series use the first episode runtime.
    #[must_use]
    pub fn runtime(&self) -> Option<(u32, u32)> {
        let minutes = match self.media.kind {
            MediaKind::Tv => self.details.episode_run_time.first().copied(),
            MediaKind::Movie | MediaKind::Person => self.details.runtime,
        }?;
        Some((minutes / 60, minutes % 60))
    }

    /// First credited director, or `"N/A"`.
    #[must_use]
    pub fn director(&self) -> String {
        self.credits
            .crew
            .iter()
            .find(|member| member.job.as_deref() == Some("Director"))
            .map_or_else(|| String::from(NOT_AVAILABLE), |member| member.name.clone())
    }

    /// All credited writers joined with `", "`, or `"N/A"`.
    #[must_use]
    pub fn writers(&self) -> String {
        let writers: Vec<&str> = self
            .credits
            .crew
            .iter()
            .filter(|member| member.job.as_deref() == Some("Writer"))
            .map(|member| member.name.as_str())
            .collect();
        if writers.is_empty() {
            String::from(NOT_AVAILABLE)
        } else {
            writers.join(", ")
        }
    }

    /// Release (or first air) date, e.g. `"March 1st, 2022"`.
    #[must_use]
    pub fn release_date(&self) -> String {
        let date = match self.media.kind {
            MediaKind::Tv => self.details.first_air_date.as_deref(),
            MediaKind::Movie | MediaKind::Person => self.details.release_date.as_deref(),
        };
        format_release_date(date)
    }

    /// The first `count` cast members in billing order.
    #[must_use]
    pub fn top_cast(&self, count: usize) -> Vec<&CastMember> {
        let mut cast: Vec<&CastMember> = self.credits.cast.iter().collect();
        cast.sort_by_key(|member| member.order);
        cast.truncate(count);
        cast
    }

    /// Preferred trailer: an official YouTube trailer, then any YouTube
    /// trailer, then any YouTube video.
    #[must_use]
    pub fn trailer(&self) -> Option<&Video> {
        let youtube = || self.videos.iter().filter(|v| v.site == "YouTube");
        youtube()
            .find(|v| v.kind == "Trailer" && v.official)
            .or_else(|| youtube().find(|v| v.kind == "Trailer"))
            .or_else(|| youtube().next())
    }

    /// Watch URL of [`Self::trailer`].
    #[must_use]
    pub fn trailer_url(&self) -> Option<String> {
        self.trailer()
            .map(|video| format!("{YOUTUBE_WATCH_URL}{}", video.key))
    }

    /// Titles similar to this one.
    #[must_use]
    pub fn similar(&self) -> &[MediaItem] {
        &self.similar
    }

    /// Titles recommended from this one.
    #[must_use]
    pub fn recommendations(&self) -> &[MediaItem] {
        &self.recommendations
    }
}

/// English ordinal suffix for a day of the month.
const fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Formats a `YYYY-MM-DD` date as `"March 4th, 2022"`.
///
/// Missing, empty or unparseable dates (including `"TBA"`) yield
/// `"Release date not available"`.
#[must_use]
pub fn format_release_date(date: Option<&str>) -> String {
    let Some(date) = date
        .map(str::trim)
        .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
    else {
        return String::from(NO_RELEASE_DATE);
    };
    format!(
        "{} {}{}, {}",
        date.format("%B"),
        date.day(),
        ordinal_suffix(date.day()),
        date.year()
    )
}
