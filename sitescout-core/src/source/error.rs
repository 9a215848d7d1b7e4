use thiserror::Error;

/// Errors from [`crate::source::PoiSource::fetch_elements`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoiSourceError {
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Endpoint that was queried.
        url: String,
        /// Timeout that elapsed, in seconds.
        timeout_secs: u64,
    },
    /// The service answered with a non-success status.
    #[error("request to {url} failed with HTTP {status}: {message}")]
    HttpError {
        /// Endpoint that was queried.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Transport detail.
        message: String,
    },
    /// The connection failed before a response arrived.
    #[error("network error contacting {url}: {message}")]
    NetworkError {
        /// Endpoint that was queried.
        url: String,
        /// Transport detail.
        message: String,
    },
    /// The response body was not valid JSON of the expected shape.
    #[error("failed to parse upstream response: {message}")]
    ParseError {
        /// Decoder detail.
        message: String,
    },
}
