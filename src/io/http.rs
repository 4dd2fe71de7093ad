use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use super::RangeFetch;
use crate::error::FetchError;

/// HTTP Range fetcher for remote archive storage.
///
/// Issues one `Range: bytes=start-end` GET per call against
/// `{base_url}/{object}` and insists on a 206 Partial Content answer with a
/// full-length body. Crawl storage serves each record as an independently
/// addressable slice, so a single ranged GET is the whole retrieval.
pub struct HttpRangeFetcher {
    client: Client,
    base_url: String,
}

impl HttpRangeFetcher {
    /// Create a fetcher for the given storage base URL
    /// (e.g. `https://commoncrawl.s3.amazonaws.com/`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn object_url(&self, object: &str) -> String {
        format!("{}/{}", self.base_url, object)
    }
}

#[async_trait]
impl RangeFetch for HttpRangeFetcher {
    async fn fetch_range(
        &self,
        object: &str,
        offset: u64,
        length: u64,
    ) -> Result<Vec<u8>, FetchError> {
        if length == 0 {
            return Ok(Vec::new());
        }

        let end = offset + length - 1;
        let range = format!("bytes={offset}-{end}");

        let resp = self
            .client
            .get(self.object_url(object))
            .header("Range", &range)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                object: object.to_string(),
                offset,
                length,
                source,
            })?;

        if resp.status() != StatusCode::PARTIAL_CONTENT {
            return Err(FetchError::Status {
                object: object.to_string(),
                offset,
                length,
                status: resp.status(),
            });
        }

        let body = resp.bytes().await.map_err(|source| FetchError::Request {
            object: object.to_string(),
            offset,
            length,
            source,
        })?;

        if (body.len() as u64) < length {
            return Err(FetchError::ShortRead {
                object: object.to_string(),
                offset,
                length,
                got: body.len(),
            });
        }

        // A 206 body should be exactly the requested range; trim any excess
        // so callers always see `length` bytes.
        let mut bytes = body.to_vec();
        bytes.truncate(length as usize);
        Ok(bytes)
    }
}
