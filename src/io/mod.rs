mod http;
mod local;
mod retry;

pub use http::HttpRangeFetcher;
pub use local::FileRangeFetcher;
pub use retry::Retrying;

use crate::error::FetchError;
use async_trait::async_trait;

/// Trait for ranged retrieval from archive storage.
///
/// One call retrieves bytes `[offset, offset + length - 1]` of the named
/// object in a single attempt. Retry policies compose around this trait
/// (see [`Retrying`]) instead of living inside an implementation.
#[async_trait]
pub trait RangeFetch: Send + Sync {
    /// Retrieve exactly `length` bytes of `object` starting at `offset`.
    async fn fetch_range(&self, object: &str, offset: u64, length: u64)
    -> Result<Vec<u8>, FetchError>;
}
