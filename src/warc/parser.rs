//! Record structure parsing.
//!
//! The record format is line-oriented text with two well-known markers, so
//! parsing is a pair of marker searches with named constants rather than a
//! full header parser. The byte boundaries matter: the target URI runs from
//! exactly [`TARGET_URI_PREFIX`] bytes past the label start to the first
//! byte of the digest marker.

use crate::error::ParseError;

use super::record::{
    ArchiveRecord, BLOCK_SEPARATOR, PAYLOAD_DIGEST_MARKER, TARGET_URI_LABEL, TARGET_URI_PREFIX,
};

/// First occurrence of `needle` in `haystack`.
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Split decompressed record bytes into the three blocks.
///
/// Leading and trailing ASCII whitespace is stripped first. The split is on
/// the first two [`BLOCK_SEPARATOR`] occurrences only; any further blank
/// lines belong to the payload.
pub fn split_record(raw: &[u8]) -> Result<ArchiveRecord, ParseError> {
    let data = raw.trim_ascii();

    let first = find(data, BLOCK_SEPARATOR).ok_or(ParseError::MalformedRecord)?;
    let rest = &data[first + BLOCK_SEPARATOR.len()..];
    let second = find(rest, BLOCK_SEPARATOR).ok_or(ParseError::MalformedRecord)?;

    Ok(ArchiveRecord {
        warc_block: data[..first].to_vec(),
        http_block: rest[..second].to_vec(),
        payload: rest[second + BLOCK_SEPARATOR.len()..].to_vec(),
    })
}

/// Extract the target URI from the WARC metadata block.
///
/// The URI is the text strictly between `WARC-Target-URI: ` and the
/// `\r\nWARC-Payload-Digest` line, decoded as UTF-8.
pub fn extract_target_uri(warc_block: &[u8]) -> Result<String, ParseError> {
    let label = find(warc_block, TARGET_URI_LABEL).ok_or(ParseError::MissingTargetUri)?;
    let start = label + TARGET_URI_PREFIX;

    let end = find(warc_block, PAYLOAD_DIGEST_MARKER).ok_or(ParseError::MissingPayloadDigest)?;

    // A digest header ahead of the URI start means the block's header order
    // is not one this parser understands.
    if end < start {
        return Err(ParseError::MalformedRecord);
    }

    let uri = std::str::from_utf8(&warc_block[start..end])?;
    Ok(uri.to_string())
}
