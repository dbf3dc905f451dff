use thiserror::Error;

/// Failure at the HTTP seam, before any status interpretation.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid server url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("undecodable response body: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error(transparent)]
    InvalidPath(#[from] shared::error::InvalidPathSegment),
    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

/// Snapshot retrieval failed; the roster shows the failure notice instead.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("activities request returned status {0}")]
    Status(u16),
    #[error("activities snapshot could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("{0}")]
    Validation(String),
    #[error("server rejected request with status {status}: {}", detail.as_deref().unwrap_or("no detail"))]
    ServerRejection { status: u16, detail: Option<String> },
    #[error(transparent)]
    Transport(#[from] TransportError),
}
