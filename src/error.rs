/// Failures surfaced by the SportsDB fetch layer.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// The shared HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    /// Network, DNS, TLS or timeout failure.
    #[error("request failed for {url}: {source}")]
    Transport {
        url: String,
        source: reqwest::Error,
    },

    #[error("http {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed reading body from {url}: {source}")]
    Body {
        url: String,
        source: reqwest::Error,
    },

    /// The body was not the JSON shape we expect.
    #[error("invalid json: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;
