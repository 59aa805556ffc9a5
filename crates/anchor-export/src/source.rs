//! Where the authoritative source document comes from.
//!
//! The merge always works on a freshly fetched copy. A fetch is
//! single-shot: no retry, no caching.

use crate::config::SourceConfig;
use crate::error::FetchError;
use std::future::Future;

pub trait DocumentSource {
    fn fetch(&self) -> impl Future<Output = Result<String, FetchError>>;
}

/// HTTP GET against the configured endpoint.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(config: SourceConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: SourceConfig) -> Self {
        Self {
            client,
            url: config.url,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl DocumentSource for HttpSource {
    async fn fetch(&self) -> Result<String, FetchError> {
        log::debug!("fetching source document from {}", self.url);
        let request_error = |source| FetchError::Request {
            url: self.url.clone(),
            source,
        };

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(request_error)
    }
}

/// A document already in memory (local files, tests).
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    document: Option<String>,
}

impl StaticSource {
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: Some(document.into()),
        }
    }

    /// A source whose every fetch fails.
    pub fn unavailable() -> Self {
        Self { document: None }
    }
}

impl DocumentSource for StaticSource {
    async fn fetch(&self) -> Result<String, FetchError> {
        self.document
            .clone()
            .ok_or_else(|| FetchError::Unavailable("no document loaded".into()))
    }
}
