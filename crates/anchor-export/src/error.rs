use anchor_core::ParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("source document unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("fetching the source document failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("source document is not well-formed: {0}")]
    Parse(#[from] ParseError),

    #[error("invalid path query `{0}`")]
    Query(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
