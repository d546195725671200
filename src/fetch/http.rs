use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{Error, Result};
use crate::fetch::Fetch;

/// HTTP GET fetcher over a shared [`reqwest::Client`].
///
/// Any transport error or non-success status becomes a typed
/// [`Error::Fetch`] carrying the offending URL.
#[derive(Clone, Default)]
pub struct HttpFetch {
    client: reqwest::Client,
}

impl HttpFetch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetch for HttpFetch {
    async fn fetch(&self, url: &str) -> Result<Bytes> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| Error::fetch(url, err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::fetch(url, format!("status {status}")));
        }

        response
            .bytes()
            .await
            .map_err(|err| Error::fetch(url, err.to_string()))
    }
}
