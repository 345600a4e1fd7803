use thiserror::Error;

/// Error type for provider construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// The configured base URL does not parse.
    #[error("invalid base URL {url:?}")]
    InvalidBaseUrl {
        /// The rejected value.
        url: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
    /// The directions API was configured without an access token.
    #[error("the directions provider requires an access token")]
    MissingAccessToken,
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
}
