//! WARC record decoding and parsing.
//!
//! This module recovers one archive record from the compressed byte range
//! located by an index entry.
//!
//! ## Architecture
//!
//! The module is organized into three components:
//!
//! - `gzip`: inflating the ranged slice into raw record bytes
//! - `record`: data structures and the named boundary constants of the
//!   record format
//! - `parser`: splitting raw bytes into blocks and extracting the target URI
//!
//! ## Record format overview
//!
//! Crawl archives are written so that every record is its own gzip member;
//! a ranged download of `[offset, offset + length - 1]` is independently
//! decompressible. The inflated bytes hold three blocks separated by blank
//! lines (`\r\n\r\n`):
//!
//! 1. WARC metadata headers (record type, target URI, digests, ...)
//! 2. The captured HTTP response headers
//! 3. The payload: the document body as fetched by the crawler
//!
//! WET (extracted-text) records have the same three-block shape with a
//! plain-text payload, so one parser serves both archive variants.
//!
//! ## Limitations
//!
//! This is not a general WARC library: only the structure needed to recover
//! the target URI and payload is parsed. Multi-record streams, `warcinfo`
//! records, and request records are out of scope.

mod gzip;
mod parser;
mod record;

pub use gzip::decode_member;
pub use parser::{extract_target_uri, split_record};
pub use record::{
    ArchiveRecord, BLOCK_SEPARATOR, PAYLOAD_DIGEST_MARKER, TARGET_URI_LABEL, TARGET_URI_PREFIX,
};
