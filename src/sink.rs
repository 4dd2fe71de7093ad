//! Document persistence under URL-derived filenames.

use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::StoreError;

/// URL characters replaced when deriving a filename.
const RESERVED: [char; 4] = ['/', '\\', ':', '?'];

/// Replace filesystem-hostile URL characters with `%<decimal-codepoint>`.
///
/// Only `/`, `\`, `:`, and `?` are rewritten; everything else, `%`
/// included, passes through untouched. Not RFC 3986 percent-encoding: the
/// minimal rule is kept so filenames match corpora stored by earlier
/// tooling, at the cost of possible collisions between URLs that already
/// contain `%<digits>` sequences.
pub fn sanitize_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        if RESERVED.contains(&c) {
            out.push('%');
            out.push_str(&(c as u32).to_string());
        } else {
            out.push(c);
        }
    }
    out
}

/// The artifact produced for one successfully processed index entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    /// URL the document was originally crawled from
    pub target_url: String,
    /// Where the payload was written
    pub path: PathBuf,
    /// Payload size in bytes
    pub bytes: u64,
}

/// Writes classified payloads into the output directory.
pub struct DocumentSink {
    output_dir: PathBuf,
}

impl DocumentSink {
    /// Sink writing into `output_dir`, which is expected to exist and be
    /// writable (the CLI creates it up front).
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Write `payload` verbatim to `{output_dir}/{sanitized url}{extension}`.
    ///
    /// Create-or-truncate: if two URLs collide under the sanitizer, the
    /// last write wins.
    pub async fn store(
        &self,
        target_url: &str,
        extension: &str,
        payload: &[u8],
    ) -> Result<StoredDocument, StoreError> {
        let file_name = format!("{}{}", sanitize_url(target_url), extension);
        let path = self.output_dir.join(file_name);

        let mut file = fs::File::create(&path)
            .await
            .map_err(|source| StoreError {
                path: path.clone(),
                source,
            })?;
        file.write_all(payload)
            .await
            .map_err(|source| StoreError {
                path: path.clone(),
                source,
            })?;
        file.flush()
            .await
            .map_err(|source| StoreError {
                path: path.clone(),
                source,
            })?;

        Ok(StoredDocument {
            target_url: target_url.to_string(),
            path,
            bytes: payload.len() as u64,
        })
    }
}
