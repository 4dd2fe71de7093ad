use async_trait::async_trait;
use std::io::SeekFrom;
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use super::RangeFetch;
use crate::error::FetchError;

/// Range fetcher over archive objects mirrored to a local directory.
///
/// Object keys resolve relative to `root`, so a pipeline built for remote
/// storage runs unchanged against a local copy of the same archive layout.
pub struct FileRangeFetcher {
    root: PathBuf,
}

impl FileRangeFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl RangeFetch for FileRangeFetcher {
    async fn fetch_range(
        &self,
        object: &str,
        offset: u64,
        length: u64,
    ) -> Result<Vec<u8>, FetchError> {
        let io_err = |source: std::io::Error| FetchError::Io {
            object: object.to_string(),
            offset,
            length,
            source,
        };

        let mut file = File::open(self.root.join(object)).await.map_err(io_err)?;
        file.seek(SeekFrom::Start(offset)).await.map_err(io_err)?;

        let mut buf = vec![0u8; length as usize];
        let mut filled = 0;
        while filled < buf.len() {
            let n = file.read(&mut buf[filled..]).await.map_err(io_err)?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        if filled < buf.len() {
            return Err(FetchError::ShortRead {
                object: object.to_string(),
                offset,
                length,
                got: filled,
            });
        }

        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_range_from_local_object() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("segment.gz"), b"abcdefghij").unwrap();

        let fetcher = FileRangeFetcher::new(dir.path());
        let bytes = fetcher.fetch_range("segment.gz", 2, 5).await.unwrap();

        assert_eq!(bytes, b"cdefg");
    }

    #[tokio::test]
    async fn range_past_eof_is_short_read() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("segment.gz"), b"abc").unwrap();

        let fetcher = FileRangeFetcher::new(dir.path());
        let err = fetcher.fetch_range("segment.gz", 1, 10).await.unwrap_err();

        assert!(matches!(err, FetchError::ShortRead { got: 2, .. }));
    }

    #[tokio::test]
    async fn missing_object_is_io_error() {
        let dir = tempfile::tempdir().unwrap();

        let fetcher = FileRangeFetcher::new(dir.path());
        let err = fetcher.fetch_range("absent.gz", 0, 1).await.unwrap_err();

        assert!(matches!(err, FetchError::Io { .. }));
    }
}
