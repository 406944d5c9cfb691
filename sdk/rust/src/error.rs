use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by the hfs client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Operation on a handle that does not allow it, e.g. a closed one.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("{url}: not found")]
    NotFound { url: String },

    #[error("{url}: server returned {status}")]
    Status { url: String, status: StatusCode },

    /// The body could not be decoded as gzip.
    #[error("{url}: response is not gzip (Content-Encoding: {encoding:?}): {source}")]
    Protocol {
        url: String,
        encoding: Option<String>,
        #[source]
        source: std::io::Error,
    },

    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
