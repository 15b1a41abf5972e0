//! Paginated list resources.

use std::fmt;

use super::types::{MediaKind, MediaRef};

/// Curated single-kind charts shown as home rails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chart {
    /// Movies currently in theatres.
    NowPlaying,
    /// Top rated movies.
    TopRated,
    /// Popular TV series.
    PopularTv,
    /// TV series with an episode airing in the next week.
    OnTheAir,
}

impl Chart {
    /// All charts in home-page order.
    pub const ALL: [Self; 4] = [
        Self::NowPlaying,
        Self::TopRated,
        Self::PopularTv,
        Self::OnTheAir,
    ];

    /// Rail heading.
    #[must_use]
    pub const fn heading(self) -> &'static str {
        match self {
            Self::NowPlaying => "Now Playing",
            Self::TopRated => "Top Rated Movies",
            Self::PopularTv => "Popular TV Shows",
            Self::OnTheAir => "On The Air",
        }
    }

    const fn path(self) -> &'static str {
        match self {
            Self::NowPlaying => "movie/now_playing",
            Self::TopRated => "movie/top_rated",
            Self::PopularTv => "tv/popular",
            Self::OnTheAir => "tv/on_the_air",
        }
    }

    const fn media_kind(self) -> MediaKind {
        match self {
            Self::NowPlaying | Self::TopRated => MediaKind::Movie,
            Self::PopularTv | Self::OnTheAir => MediaKind::Tv,
        }
    }
}

/// A paginated list resource of the catalog API.
///
/// Acts as the query key of a fetch session: two equal feeds address the
/// same sequence of pages.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Feed {
    /// Weekly trending movies, series and people.
    Trending,
    /// A curated chart.
    Chart(Chart),
    /// Popularity-sorted discovery for one media kind.
    Discover(MediaKind),
    /// Multi search (movies, series and people).
    Search(String),
    /// Titles similar to a movie or series.
    Similar(MediaRef),
    /// Titles recommended from a movie or series.
    Recommendations(MediaRef),
}

impl Feed {
    /// Builds a search feed from raw user input.
    pub fn search(query: impl Into<String>) -> Self {
        Self::Search(query.into())
    }

    /// Resource path relative to the API base URL.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Trending => String::from("trending/all/week"),
            Self::Chart(chart) => String::from(chart.path()),
            Self::Discover(kind) => format!("discover/{kind}"),
            Self::Search(_) => String::from("search/multi"),
            Self::Similar(media) => format!("{}/similar", media.path()),
            Self::Recommendations(media) => format!("{}/recommendations", media.path()),
        }
    }

    /// Extra query parameters beyond language/page.
    #[must_use]
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Search(query) => vec![("query", String::from(query.trim()))],
            Self::Discover(_) => vec![("sort_by", String::from("popularity.desc"))],
            Self::Trending | Self::Chart(_) | Self::Similar(_) | Self::Recommendations(_) => {
                Vec::new()
            }
        }
    }

    /// Media kind implied by the resource, if it serves a single kind.
    #[must_use]
    pub const fn media_kind(&self) -> Option<MediaKind> {
        match self {
            Self::Trending | Self::Search(_) => None,
            Self::Chart(chart) => Some(chart.media_kind()),
            Self::Discover(kind) => Some(*kind),
            Self::Similar(media) | Self::Recommendations(media) => Some(media.kind),
        }
    }

    /// `true` when the feed cannot produce a request (blank search).
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Search(query) if query.trim().is_empty())
    }
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Search(query) => write!(f, "search \"{}\"", query.trim()),
            Self::Trending | Self::Chart(_) | Self::Discover(_) => f.write_str(&self.path()),
            Self::Similar(media) => write!(f, "similar to {}", media.path()),
            Self::Recommendations(media) => write!(f, "recommended from {}", media.path()),
        }
    }
}
