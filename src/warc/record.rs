/// Separator between the record's three blocks (a blank line).
pub const BLOCK_SEPARATOR: &[u8] = b"\r\n\r\n";

/// Header label that opens the target URI line, including the colon.
pub const TARGET_URI_LABEL: &[u8] = b"WARC-Target-URI:";

/// Bytes from the label start to the URI itself: the label plus one space.
pub const TARGET_URI_PREFIX: usize = TARGET_URI_LABEL.len() + 1;

/// Marker terminating the target URI: the CRLF that starts the payload
/// digest header on the following line.
pub const PAYLOAD_DIGEST_MARKER: &[u8] = b"\r\nWARC-Payload-Digest";

/// One decompressed archive record, split into its three blocks.
///
/// Transient and in-memory only; each record is owned by the processing of
/// a single index entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRecord {
    /// WARC metadata headers (record type, target URI, digests, ...)
    pub warc_block: Vec<u8>,
    /// Transport headers of the original fetch
    pub http_block: Vec<u8>,
    /// The document body as fetched by the crawler
    pub payload: Vec<u8>,
}
