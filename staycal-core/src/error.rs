//! Error types for staycal.

use thiserror::Error;

/// Why a single HTTP attempt did not produce a document.
#[derive(Error, Debug)]
pub enum FetchFailure {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),
}

/// Errors that can occur in staycal operations.
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Direct fetch of the feed failed. Recovered by the proxy retry.
    #[error("Direct fetch of {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: FetchFailure,
    },

    /// Proxied fetch failed too; the calendar is unavailable.
    #[error("Proxied fetch of {url} failed: {source}")]
    Proxy {
        url: String,
        #[source]
        source: FetchFailure,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for staycal operations.
pub type CalendarResult<T> = Result<T, CalendarError>;
