//! Fetching documents and style sheets.
//!
//! The engine never touches the network or the filesystem itself. A
//! [`ResourceLoader`] is handed every URL it needs, already resolved against
//! the page URL.

use std::fs;
use std::io;
use std::time::Duration;

use thiserror::Error;

/// Why a resource could not be fetched.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Reading a local file failed.
    #[error("failed to read '{path}': {source}")]
    File {
        /// The path that was read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The request could not be made or its body not read.
    #[error("network error for '{url}': {message}")]
    Network {
        /// The requested URL.
        url: String,
        /// What went wrong.
        message: String,
    },
    /// The server answered with a non-success status.
    #[error("'{url}' returned HTTP {status}")]
    Status {
        /// The requested URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },
}

/// Something that can turn a URL into text.
pub trait ResourceLoader {
    /// Fetch `url` as text.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the resource is unavailable.
    fn fetch(&self, url: &str) -> Result<String, LoadError>;
}

/// Loads `http(s)://` URLs over the network and everything else from the
/// filesystem (`file://` URLs and plain paths).
pub struct NetLoader {
    client: Option<reqwest::blocking::Client>,
}

impl NetLoader {
    /// Request timeout.
    pub const TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a loader. If no HTTP client can be built, network URLs fail
    /// with [`LoadError::Network`] while local files still load.
    #[must_use]
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Self::TIMEOUT)
            .user_agent(concat!("wombat/", env!("CARGO_PKG_VERSION")))
            .build()
            .ok();
        Self { client }
    }

    fn fetch_http(&self, url: &str) -> Result<String, LoadError> {
        let network = |message: String| LoadError::Network {
            url: url.to_string(),
            message,
        };
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| network("no HTTP client available".to_string()))?;
        let response = client
            .get(url)
            .send()
            .map_err(|e| network(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response
            .text()
            .map_err(|e| network(format!("failed to read response body: {e}")))
    }
}

impl Default for NetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceLoader for NetLoader {
    fn fetch(&self, url: &str) -> Result<String, LoadError> {
        if url.starts_with("http://") || url.starts_with("https://") {
            return self.fetch_http(url);
        }
        let path = url.strip_prefix("file://").unwrap_or(url);
        fs::read_to_string(path).map_err(|source| LoadError::File {
            path: path.to_string(),
            source,
        })
    }
}
