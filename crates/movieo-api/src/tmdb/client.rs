//! `CatalogClient` - catalog API client implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::LocalCatalogApi;
use super::error::{FetchError, FetchResult};
use super::feed::Feed;
use super::rate_limiter::RequestPacer;
use super::types::{
    ApiConfiguration, CatalogErrorResponse, Credits, MediaDetails, MediaItem, MediaRef, Page,
    Video, VideoList,
};

/// Default base URL for the catalog API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Default response language.
const DEFAULT_LANGUAGE: &str = "en-US";

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum number of retries for HTTP 429 responses.
const MAX_RETRIES: u32 = 3;

/// Backoff unit between retries (multiplied by the attempt number).
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// Catalog API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Bearer API token.
    api_token: String,
    /// Response language.
    language: String,
    /// Include adult titles in lists.
    include_adult: bool,
    /// Request pacer.
    pacer: Arc<Mutex<RequestPacer>>,
}

/// Builder for `CatalogClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogClientBuilder {
    base_url: Option<Url>,
    api_token: Option<String>,
    user_agent: Option<String>,
    language: Option<String>,
    include_adult: bool,
    min_interval: Option<Duration>,
    timeout: Option<Duration>,
}

impl CatalogClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_token: None,
            user_agent: None,
            language: None,
            include_adult: false,
            min_interval: None,
            timeout: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API bearer token (required).
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the User-Agent (default: `movieo-api/<version>`).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the response language (default: `en-US`).
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Includes adult titles in list responses (default: false).
    #[must_use]
    pub const fn include_adult(mut self, include: bool) -> Self {
        self.include_adult = include;
        self
    }

    /// Sets the minimum request interval (default: 25ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Sets the per-request timeout (default: 30s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_token` is not set or blank ([`FetchError::MissingCredential`]).
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<CatalogClient> {
        let api_token = self
            .api_token
            .filter(|token| !token.trim().is_empty())
            .ok_or(FetchError::MissingCredential)?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let user_agent = self.user_agent.unwrap_or_else(|| {
            String::from(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
        });

        let pacer = self
            .min_interval
            .map_or_else(RequestPacer::default_interval, RequestPacer::new);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .context("failed to build HTTP client")?;

        Ok(CatalogClient {
            http_client,
            base_url,
            api_token,
            language: self
                .language
                .unwrap_or_else(|| String::from(DEFAULT_LANGUAGE)),
            include_adult: self.include_adult,
            pacer: Arc::new(Mutex::new(pacer)),
        })
    }
}

impl CatalogClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> CatalogClientBuilder {
        CatalogClientBuilder::new()
    }

    /// Sends a GET request with Bearer auth, query params, and pacing.
    /// Retries up to `MAX_RETRIES` times on HTTP 429.
    #[instrument(skip_all, fields(path = path))]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> FetchResult<T> {
        let waited = self.pacer.lock().await.wait().await;
        if !waited.is_zero() {
            tracing::trace!(waited = ?waited, "request paced");
        }

        let url = self
            .base_url
            .join(path)
            .map_err(|e| FetchError::NetworkFailure(format!("invalid URL path {path}: {e}")))?;

        let mut retries = 0u32;
        loop {
            let request = self
                .http_client
                .get(url.clone())
                .bearer_auth(&self.api_token)
                .query(query)
                .build()?;

            tracing::debug!(url = %request.url(), "catalog API request");

            let response = self.http_client.execute(request).await?;
            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                retries = retries.saturating_add(1);
                if retries > MAX_RETRIES {
                    return Err(FetchError::UpstreamError {
                        status: status.as_u16(),
                        message: format!("rate limit exceeded after {MAX_RETRIES} retries"),
                    });
                }
                tracing::warn!(
                    retry = retries,
                    max_retries = MAX_RETRIES,
                    "catalog API rate limited (429). Retrying..."
                );
                tokio::time::sleep(RETRY_BACKOFF.saturating_mul(retries)).await;
                self.pacer.lock().await.wait().await;
                continue;
            }

            if !status.is_success() {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| String::from("<failed to read body>"));
                let message = serde_json::from_str::<CatalogErrorResponse>(&body)
                    .map_or(body, |error_response| error_response.status_message);
                tracing::warn!(status = status.as_u16(), %message, "catalog API error");
                return Err(FetchError::UpstreamError {
                    status: status.as_u16(),
                    message,
                });
            }

            let body = response.text().await?;
            return serde_json::from_str(&body)
                .map_err(|e| FetchError::MalformedResponse(format!("{path}: {e}")));
        }
    }

    /// Common query parameters for localized endpoints.
    fn localized(&self) -> Vec<(&'static str, String)> {
        vec![("language", self.language.clone())]
    }
}

impl LocalCatalogApi for CatalogClient {
    #[instrument(skip_all, fields(feed = %feed, page))]
    async fn fetch_page(&self, feed: &Feed, page: u32) -> FetchResult<Page<MediaItem>> {
        let mut query = self.localized();
        query.push(("page", page.to_string()));
        query.push(("include_adult", self.include_adult.to_string()));
        query.extend(feed.query_params());

        let mut response: Page<MediaItem> = self.get_json(&feed.path(), &query).await?;
        let kind = feed.media_kind();
        response.results = response
            .results
            .into_iter()
            .map(|item| item.with_default_kind(kind))
            .collect();

        tracing::debug!(
            fetched = response.results.len(),
            total_pages = response.total_pages,
            "page fetched"
        );
        Ok(response)
    }

    #[instrument(skip_all)]
    async fn configuration(&self) -> FetchResult<ApiConfiguration> {
        self.get_json("configuration", &[]).await
    }

    #[instrument(skip_all, fields(media = %media.path()))]
    async fn details(&self, media: MediaRef) -> FetchResult<MediaDetails> {
        self.get_json(&media.path(), &self.localized()).await
    }

    #[instrument(skip_all, fields(media = %media.path()))]
    async fn credits(&self, media: MediaRef) -> FetchResult<Credits> {
        let path = format!("{}/credits", media.path());
        self.get_json(&path, &self.localized()).await
    }

    #[instrument(skip_all, fields(media = %media.path()))]
    async fn videos(&self, media: MediaRef) -> FetchResult<Vec<Video>> {
        let path = format!("{}/videos", media.path());
        let list: VideoList = self.get_json(&path, &self.localized()).await?;
        Ok(list.results)
    }
}
