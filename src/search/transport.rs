//! HTTP transport for the search endpoint.
//!
//! The pipeline only needs "GET this URL, give me the body"; retries and
//! connection policy belong to the transport, not to the search core.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use super::error::SearchError;

#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// Fetch the response body. Non-2xx replies are errors.
    async fn get(&self, url: Url) -> Result<Vec<u8>, SearchError>;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(request_timeout: Duration) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .user_agent(concat!("fos/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SearchTransport for HttpTransport {
    async fn get(&self, url: Url) -> Result<Vec<u8>, SearchError> {
        debug!(url = %url, "search_request");
        let response = self
            .client
            .get(url.clone())
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
