//! Error types for ccfetch.
//!
//! Each pipeline stage has its own error type carrying enough context
//! (object key, offset, length, path) to diagnose a failure from the log
//! line alone. [`RecordError`] unifies them at the per-entry boundary;
//! [`IndexError`] is the only run-fatal kind.

use std::path::PathBuf;
use thiserror::Error;

/// Failure retrieving a byte range from archive storage.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or its body could not be read.
    #[error("range request for {object} at {offset}+{length} failed: {source}")]
    Request {
        /// Remote object key
        object: String,
        /// First byte of the requested range
        offset: u64,
        /// Number of bytes requested
        length: u64,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with something other than 206 Partial Content.
    #[error("range request for {object} at {offset}+{length} returned status {status}")]
    Status {
        /// Remote object key
        object: String,
        /// First byte of the requested range
        offset: u64,
        /// Number of bytes requested
        length: u64,
        /// The unexpected HTTP status
        status: reqwest::StatusCode,
    },

    /// The response body carried fewer bytes than the requested range.
    #[error("range request for {object} at {offset}+{length} returned only {got} bytes")]
    ShortRead {
        /// Remote object key
        object: String,
        /// First byte of the requested range
        offset: u64,
        /// Number of bytes requested
        length: u64,
        /// Bytes actually received
        got: usize,
    },

    /// A local archive object could not be read.
    #[error("reading {object} at {offset}+{length} failed: {source}")]
    Io {
        /// Archive object path relative to the fetcher root
        object: String,
        /// First byte of the requested range
        offset: u64,
        /// Number of bytes requested
        length: u64,
        #[source]
        source: std::io::Error,
    },
}

/// The ranged slice was not a valid self-contained gzip member.
#[derive(Debug, Error)]
#[error("invalid gzip member: {source}")]
pub struct DecodeError {
    #[from]
    source: std::io::Error,
}

/// The decompressed bytes did not have the expected record structure.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Fewer than two CRLFCRLF separators; the record cannot be split into
    /// metadata, header, and payload blocks.
    #[error("malformed record: expected three CRLFCRLF-separated blocks")]
    MalformedRecord,

    /// The metadata block has no `WARC-Target-URI:` header.
    #[error("metadata block has no WARC-Target-URI header")]
    MissingTargetUri,

    /// The metadata block has no `WARC-Payload-Digest` header terminating
    /// the target URI.
    #[error("metadata block has no WARC-Payload-Digest marker")]
    MissingPayloadDigest,

    /// The bytes between the URI markers are not valid UTF-8.
    #[error("target URI is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// The detected MIME type has no configured extension mapping.
#[derive(Debug, Error)]
#[error("no extension mapping for MIME type {0}")]
pub struct UnsupportedTypeError(pub String);

/// The payload could not be written to the output directory.
#[derive(Debug, Error)]
#[error("writing {path} failed: {source}")]
pub struct StoreError {
    /// Destination path of the failed write
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Any failure while processing one index entry.
///
/// Every variant is local to that entry: the batch loop logs it together
/// with the entry's filename/offset/length and moves on to the next entry.
#[derive(Debug, Error)]
pub enum RecordError {
    /// Range retrieval failed
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// Gzip inflation failed
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// Record structure or target URI extraction failed
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// MIME type outside the configured extension mapping
    #[error(transparent)]
    UnsupportedType(#[from] UnsupportedTypeError),
    /// Local write failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RecordError {
    /// Name of the pipeline stage that produced this error.
    pub fn stage(&self) -> &'static str {
        match self {
            RecordError::Fetch(_) => "fetch",
            RecordError::Decode(_) => "decode",
            RecordError::Parse(_) => "parse",
            RecordError::UnsupportedType(_) => "classify",
            RecordError::Store(_) => "store",
        }
    }
}

/// Failure talking to the crawl index service. Unlike [`RecordError`],
/// this aborts the whole run: without index entries there is no work.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The index query could not be sent or its body could not be read.
    #[error("index query failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The index service answered with a non-success status.
    #[error("index query returned status {0}")]
    Status(reqwest::StatusCode),

    /// A response line was not a valid index entry.
    #[error("index response line is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
