//! Catalog fetch error taxonomy.

/// Result alias for catalog API calls.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Failure of a single catalog request.
///
/// An empty result set is not an error: a successful response with zero
/// items decodes into an empty `Page`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The API token is absent. No request was attempted.
    #[error("API token is missing (set TMDB_API_TOKEN); retrying will not help")]
    MissingCredential,
    /// Transport failure or timeout.
    #[error("network failure: {0}")]
    NetworkFailure(String),
    /// Non-2xx response from the catalog API.
    #[error("catalog API error (HTTP {status}): {message}")]
    UpstreamError {
        /// HTTP status code.
        status: u16,
        /// Upstream `status_message`, or the raw body.
        message: String,
    },
    /// 2xx response whose body could not be decoded.
    #[error("malformed catalog response: {0}")]
    MalformedResponse(String),
}

impl FetchError {
    /// Returns `false` for failures that a plain retry cannot fix.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::MissingCredential)
    }

    /// Human-readable message for the presentation layer.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingCredential => String::from(
                "API key is missing or invalid. Set TMDB_API_TOKEN and restart.",
            ),
            Self::UpstreamError { status: 401, .. } => String::from(
                "The catalog rejected the API key. Check TMDB_API_TOKEN and restart.",
            ),
            Self::NetworkFailure(_) | Self::UpstreamError { .. } | Self::MalformedResponse(_) => {
                format!("Unable to fetch data. Please try again. ({self})")
            }
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::NetworkFailure(String::from("timeout"))
        } else if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::NetworkFailure(err.to_string())
        }
    }
}
