use flate2::read::GzDecoder;
use std::io::Read;

use crate::error::DecodeError;

/// Inflate one self-contained gzip member into raw record bytes.
///
/// Pure transformation: no I/O, no side effects. Input that is not a gzip
/// stream, or that ends mid-stream, is a [`DecodeError`].
pub fn decode_member(compressed: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut decoder = GzDecoder::new(compressed);
    let mut raw = Vec::new();
    decoder.read_to_end(&mut raw)?;
    Ok(raw)
}
