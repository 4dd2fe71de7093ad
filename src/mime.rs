//! Content classification by byte inspection.
//!
//! Detection looks only at payload bytes, never at filenames or the
//! captured response headers (crawled servers routinely misdeclare
//! Content-Type). The detector is a capability trait so tests can swap in
//! a fixed answer, and the MIME→extension table is immutable configuration
//! owned by the classifier.

use std::collections::HashMap;

use crate::error::UnsupportedTypeError;

/// MIME name for HTML documents.
pub const TEXT_HTML: &str = "text/html";
/// MIME name for plain text.
pub const TEXT_PLAIN: &str = "text/plain";

const APPLICATION_OCTET_STREAM: &str = "application/octet-stream";

/// Bytes of the payload sampled by the plain-text heuristic.
const TEXT_SAMPLE_LEN: usize = 512;

/// Capability trait: name the MIME type of a payload from its bytes.
pub trait DetectMime: Send + Sync {
    /// Detect the MIME type of `bytes`.
    fn detect(&self, bytes: &[u8]) -> &'static str;
}

/// Byte-signature detector.
///
/// Binary formats are matched by magic number, HTML by its opening tags
/// after leading whitespace, and anything else decodable as text falls back
/// to `text/plain`.
pub struct SignatureDetector;

/// Exact leading magic numbers for binary formats.
const MAGIC_NUMBERS: &[(&[u8], &str)] = &[
    (b"%PDF-", "application/pdf"),
    (b"\x89PNG\r\n\x1a\n", "image/png"),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"\xff\xd8\xff", "image/jpeg"),
    (b"PK\x03\x04", "application/zip"),
    (b"\x1f\x8b", "application/gzip"),
];

/// Case-insensitive opening tags that mark a document as HTML.
const HTML_MARKERS: &[&[u8]] = &[
    b"<!doctype html",
    b"<html",
    b"<head",
    b"<body",
    b"<title",
    b"<!--",
];

fn starts_with_ignore_case(data: &[u8], prefix: &[u8]) -> bool {
    data.len() >= prefix.len() && data[..prefix.len()].eq_ignore_ascii_case(prefix)
}

fn looks_textual(data: &[u8]) -> bool {
    if data.is_empty() {
        return false;
    }

    let sample = &data[..data.len().min(TEXT_SAMPLE_LEN)];
    if sample.contains(&0) {
        return false;
    }

    match std::str::from_utf8(sample) {
        Ok(_) => true,
        // The sample may end mid-character; only reject on invalid bytes.
        Err(e) => e.error_len().is_none(),
    }
}

impl DetectMime for SignatureDetector {
    fn detect(&self, bytes: &[u8]) -> &'static str {
        for (magic, mime) in MAGIC_NUMBERS {
            if bytes.starts_with(magic) {
                return mime;
            }
        }

        let body = bytes.trim_ascii_start();
        for marker in HTML_MARKERS {
            if starts_with_ignore_case(body, marker) {
                return TEXT_HTML;
            }
        }

        if looks_textual(body) {
            TEXT_PLAIN
        } else {
            APPLICATION_OCTET_STREAM
        }
    }
}

/// Detected MIME type and its mapped filesystem extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    /// Detected MIME name, e.g. `text/html`
    pub mime_type: String,
    /// Mapped extension including the dot, e.g. `.html`
    pub extension: String,
}

/// Maps payload bytes to a filesystem extension.
///
/// The MIME→extension table is fixed at construction; a detected type
/// outside the table is an [`UnsupportedTypeError`], which callers treat as
/// a per-record skip.
pub struct ContentClassifier<D = SignatureDetector> {
    detector: D,
    extensions: HashMap<String, String>,
}

impl ContentClassifier {
    /// Classifier with the signature detector and the default table:
    /// `text/html → .html`, `text/plain → .txt`.
    pub fn new() -> Self {
        Self::with_mapping(
            SignatureDetector,
            [(TEXT_HTML, ".html"), (TEXT_PLAIN, ".txt")],
        )
    }
}

impl Default for ContentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: DetectMime> ContentClassifier<D> {
    /// Classifier with a custom detector and extension table.
    pub fn with_mapping<I, K, V>(detector: D, mapping: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            detector,
            extensions: mapping
                .into_iter()
                .map(|(mime, ext)| (mime.into(), ext.into()))
                .collect(),
        }
    }

    /// Detect the payload's MIME type and look up its extension.
    pub fn classify(&self, payload: &[u8]) -> Result<Classified, UnsupportedTypeError> {
        let mime_type = self.detector.detect(payload);

        let extension = self
            .extensions
            .get(mime_type)
            .cloned()
            .ok_or_else(|| UnsupportedTypeError(mime_type.to_string()))?;

        Ok(Classified {
            mime_type: mime_type.to_string(),
            extension,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doctype_html_is_html() {
        let classified = ContentClassifier::new()
            .classify(b"<!DOCTYPE html>\n<html><body>hi</body></html>")
            .unwrap();

        assert_eq!(classified.mime_type, TEXT_HTML);
        assert_eq!(classified.extension, ".html");
    }

    #[test]
    fn html_tag_detection_ignores_case_and_leading_whitespace() {
        let classified = ContentClassifier::new()
            .classify(b"\n\n  <HTML><BODY>shouting</BODY></HTML>")
            .unwrap();

        assert_eq!(classified.mime_type, TEXT_HTML);
    }

    #[test]
    fn readable_text_is_plain() {
        let classified = ContentClassifier::new()
            .classify("Innopolis is a town in Tatarstan.\n".as_bytes())
            .unwrap();

        assert_eq!(classified.mime_type, TEXT_PLAIN);
        assert_eq!(classified.extension, ".txt");
    }

    #[test]
    fn png_is_unsupported_by_default() {
        let err = ContentClassifier::new()
            .classify(b"\x89PNG\r\n\x1a\n rest of image")
            .unwrap_err();

        assert_eq!(err.0, "image/png");
    }

    #[test]
    fn binary_garbage_is_octet_stream() {
        let err = ContentClassifier::new()
            .classify(&[0x00, 0x01, 0x02, 0xfe, 0xff])
            .unwrap_err();

        assert_eq!(err.0, "application/octet-stream");
    }

    #[test]
    fn mapping_extends_through_the_constructor() {
        let classifier = ContentClassifier::with_mapping(
            SignatureDetector,
            [(TEXT_HTML, ".html"), ("application/pdf", ".pdf")],
        );

        let classified = classifier.classify(b"%PDF-1.7 ...").unwrap();
        assert_eq!(classified.extension, ".pdf");
    }

    #[test]
    fn detector_is_pluggable() {
        struct Fixed;
        impl DetectMime for Fixed {
            fn detect(&self, _bytes: &[u8]) -> &'static str {
                "application/x-test"
            }
        }

        let classifier =
            ContentClassifier::with_mapping(Fixed, [("application/x-test", ".test")]);
        let classified = classifier.classify(b"anything at all").unwrap();

        assert_eq!(classified.mime_type, "application/x-test");
        assert_eq!(classified.extension, ".test");
    }
}
