use async_trait::async_trait;
use std::time::Duration;

use super::RangeFetch;
use crate::error::FetchError;

impl FetchError {
    /// True for transient failures worth re-issuing: connect/timeout errors
    /// and 5xx answers. Short reads and client errors are permanent.
    fn is_retryable(&self) -> bool {
        match self {
            FetchError::Request { source, .. } => source.is_timeout() || source.is_connect(),
            FetchError::Status { status, .. } => status.is_server_error(),
            FetchError::ShortRead { .. } => false,
            FetchError::Io { source, .. } => matches!(
                source.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
        }
    }
}

/// Retry-with-backoff wrapper around any [`RangeFetch`].
///
/// The wrapped fetcher stays single-attempt; this decorator re-issues the
/// call for transient failures with linearly growing delays. Permanent
/// failures and exhausted attempts surface unchanged.
pub struct Retrying<F> {
    inner: F,
    max_attempts: u32,
    base_delay: Duration,
}

impl<F> Retrying<F> {
    pub fn new(inner: F, max_attempts: u32) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            base_delay: Duration::from_millis(500),
        }
    }

    /// Override the first retry delay (subsequent delays grow linearly).
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }
}

#[async_trait]
impl<F: RangeFetch> RangeFetch for Retrying<F> {
    async fn fetch_range(
        &self,
        object: &str,
        offset: u64,
        length: u64,
    ) -> Result<Vec<u8>, FetchError> {
        let mut attempt = 1;
        loop {
            match self.inner.fetch_range(object, offset, length).await {
                Ok(bytes) => return Ok(bytes),
                Err(err) if attempt < self.max_attempts && err.is_retryable() => {
                    tracing::warn!(
                        object,
                        offset,
                        length,
                        attempt,
                        error = %err,
                        "transient fetch failure, retrying"
                    );
                    tokio::time::sleep(self.base_delay * attempt).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
