//! Home page rails.

use futures::future::join_all;
use movieo_api::tmdb::{Chart, Feed, FetchError, LocalCatalogApi, MediaItem};
use tracing::instrument;

/// One horizontal list on the home page.
#[derive(Debug, Clone)]
pub struct Rail {
    /// Chart shown by this rail.
    pub chart: Chart,
    /// First page of the chart (empty on failure).
    pub items: Vec<MediaItem>,
    /// Failure, if the chart could not be fetched.
    pub error: Option<FetchError>,
}

impl Rail {
    /// Rail heading.
    #[must_use]
    pub const fn heading(&self) -> &'static str {
        self.chart.heading()
    }
}

/// The chart rails of the home page, each loaded independently.
#[derive(Debug, Clone, Default)]
pub struct HomeRails {
    rails: Vec<Rail>,
}

impl HomeRails {
    /// Fetches page 1 of every chart concurrently.
    ///
    /// A failing chart does not affect the others.
    #[allow(clippy::future_not_send)]
    #[instrument(skip_all)]
    pub async fn load(api: &impl LocalCatalogApi) -> Self {
        let feeds: Vec<Feed> = Chart::ALL.into_iter().map(Feed::Chart).collect();
        let results = join_all(feeds.iter().map(|feed| api.fetch_page(feed, 1))).await;

        let rails: Vec<Rail> = Chart::ALL
            .into_iter()
            .zip(results)
            .map(|(chart, result)| match result {
                Ok(page) => Rail {
                    chart,
                    items: page.results,
                    error: None,
                },
                Err(err) => {
                    tracing::warn!(chart = chart.heading(), error = %err, "rail failed to load");
                    Rail {
                        chart,
                        items: Vec::new(),
                        error: Some(err),
                    }
                }
            })
            .collect();

        let home = Self { rails };
        tracing::debug!(rails = home.rails.len(), failed = home.failed(), "home rails loaded");
        home
    }

    /// Rails in display order.
    #[must_use]
    pub fn rails(&self) -> &[Rail] {
        &self.rails
    }

    /// Number of rails that failed to load.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.rails.iter().filter(|rail| rail.error.is_some()).count()
    }
}
