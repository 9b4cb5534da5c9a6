use opex_usage::NodesMap;
use reqwest::header::CACHE_CONTROL;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::time::Duration;

use crate::DataFile;

#[cfg(test)]
#[path = "./client.tests.rs"]
mod client_tests;

/// Possible errors from fetching data files.
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    /// Server answered with a non-success status.
    #[error("error {status} ({text})")]
    Status { status: u16, text: String },

    /// Request could not be sent or its body could not be received.
    #[error("error {} ({source})", .source.status().map(|s| s.as_u16()).unwrap_or_default())]
    Request {
        #[from]
        source: reqwest::Error,
    },

    /// Local data file cannot be read.
    #[error("cannot read data file: {0}")]
    Io(#[from] std::io::Error),

    /// Data file is not a valid JSON document of the expected shape.
    #[error("cannot parse data file: {0}")]
    Parse(#[from] serde_json::Error),

    /// Local data file was not read in time.
    #[error("data file read timed out")]
    Timeout,
}

/// Location the data files are fetched from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// Base `http(s)://` URL, without the trailing slash.
    Http(String),

    /// Local directory.
    Directory(PathBuf),
}

impl DataSource {
    /// Creates new [`DataSource`] from a base URL or a directory path.
    pub fn new(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            DataSource::Http(location.trim_end_matches('/').to_owned())
        } else {
            DataSource::Directory(PathBuf::from(location.strip_prefix("file://").unwrap_or(location)))
        }
    }

    /// Returns the URL or path of the specified data file.
    pub fn location_of(&self, file: DataFile) -> String {
        match self {
            DataSource::Http(base) => format!("{base}/{}", file.file_name()),
            DataSource::Directory(dir) => dir.join(file.file_name()).display().to_string(),
        }
    }
}

/// Client that fetches usage data files from a [`DataSource`].
#[derive(Debug, Clone)]
pub struct UsageClient {
    source: DataSource,
    http: reqwest::Client,
    timeout: Duration,
}

impl UsageClient {
    /// Creates new [`UsageClient`] instance.
    pub fn new(source: DataSource, timeout: Duration) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { source, http, timeout })
    }

    /// Returns the data source of this client.
    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// Fetches `nodes.json`.
    pub async fn fetch_nodes(&self) -> Result<NodesMap, TransportError> {
        self.fetch(DataFile::Nodes).await
    }

    /// Fetches the specified data file and deserializes it.
    pub async fn fetch<T: DeserializeOwned>(&self, file: DataFile) -> Result<T, TransportError> {
        let body = match &self.source {
            DataSource::Http(_) => self.fetch_http(file).await?,
            DataSource::Directory(dir) => {
                let path = dir.join(file.file_name());
                tokio::time::timeout(self.timeout, tokio::fs::read(path))
                    .await
                    .map_err(|_| TransportError::Timeout)??
            },
        };

        Ok(serde_json::from_slice(&body)?)
    }

    async fn fetch_http(&self, file: DataFile) -> Result<Vec<u8>, TransportError> {
        let url = self.source.location_of(file);
        tracing::debug!("Fetching {url}");

        let response = self.http.get(&url).header(CACHE_CONTROL, "no-cache").send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                text: status.canonical_reason().unwrap_or_default().to_owned(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
