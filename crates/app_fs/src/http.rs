//! HTTP listing client for the browse backend

use crate::{FsError, Listing, ListingSource, RemotePath, Result};
use async_trait::async_trait;
use browse_proto::{BROWSE_ENDPOINT, BROWSE_PATH_PARAM};
use reqwest::{Client, Url};
use std::time::Duration;

/// Transport settings for the listing client
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// Listing endpoint, relative to the base address
    pub browse_endpoint: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            browse_endpoint: BROWSE_ENDPOINT.to_string(),
            request_timeout: Duration::from_secs(15),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

/// Fetches listings with `GET {base}/browse?path={wire}`
pub struct HttpListingSource {
    client: Client,
    browse_url: Url,
}

impl HttpListingSource {
    /// Create a client for the backend at `base_url` (`http://host:port`)
    pub fn new(base_url: &str, options: &HttpOptions) -> Result<Self> {
        let base = base_url.trim_end_matches('/');
        let browse_url = Url::parse(&format!("{}{}", base, options.browse_endpoint))
            .map_err(|e| FsError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let client = Client::builder()
            .timeout(options.request_timeout)
            .connect_timeout(options.connect_timeout)
            .build()
            .map_err(|e| FsError::Transport(e.to_string()))?;

        tracing::debug!("Listing endpoint: {}", browse_url);

        Ok(Self { client, browse_url })
    }

    /// The fully qualified listing endpoint
    pub fn browse_url(&self) -> &str {
        self.browse_url.as_str()
    }
}

#[async_trait]
impl ListingSource for HttpListingSource {
    async fn fetch(&self, path: &RemotePath) -> Result<Listing> {
        let wire = path.to_wire_string();
        tracing::debug!(path = %wire, "GET {}", self.browse_url);

        let response = self
            .client
            .get(self.browse_url.clone())
            .query(&[(BROWSE_PATH_PARAM, wire.as_str())])
            .send()
            .await
            .map_err(|e| FsError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.as_str().to_string());
            tracing::debug!(path = %wire, "Listing request failed: {}", status);
            return Err(FsError::Status {
                code: status.as_u16(),
                text,
            });
        }

        response
            .json::<Listing>()
            .await
            .map_err(|e| FsError::Decode(e.to_string()))
    }
}
