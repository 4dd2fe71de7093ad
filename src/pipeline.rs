//! The record-extraction pipeline.
//!
//! For each index entry: range-fetch the compressed record, inflate it,
//! split it into blocks, recover the target URI, classify the payload, and
//! store the payload on disk. Entries are independent; a failure in any
//! stage skips that entry only and the batch continues.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::RecordError;
use crate::index::IndexEntry;
use crate::io::RangeFetch;
use crate::mime::{ContentClassifier, DetectMime, SignatureDetector};
use crate::sink::{DocumentSink, StoredDocument};
use crate::warc;

/// Which rendition of the archive a run reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveVariant {
    /// Full WARC records: captured response headers plus raw body.
    #[default]
    Full,
    /// WET extracted-text records. Index entries point at the WARC object;
    /// the text rendition lives in a sibling object with a rewritten
    /// segment directory and filename suffix.
    TextOnly,
}

impl ArchiveVariant {
    /// Object key actually fetched for an entry's filename.
    pub fn object_key(&self, filename: &str) -> String {
        match self {
            ArchiveVariant::Full => filename.to_string(),
            ArchiveVariant::TextOnly => filename
                .replace("warc/CC-MAIN", "wet/CC-MAIN")
                .replace(".warc.", ".warc.wet."),
        }
    }
}

/// Cloneable cancellation flag checked between entries.
///
/// Cancelling lets the in-flight record finish; no further fetches are
/// issued.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that the run stop before the next entry.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A skipped entry and the error that caused the skip.
#[derive(Debug)]
pub struct EntryFailure {
    /// The entry that could not be processed
    pub entry: IndexEntry,
    /// What went wrong, with the failing stage attached
    pub error: RecordError,
}

/// Outcome of one batch run: best-effort, never all-or-nothing.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Entries handed to the run
    pub total: usize,
    /// Documents written, in index order
    pub stored: Vec<StoredDocument>,
    /// Entries skipped, each with its error
    pub failures: Vec<EntryFailure>,
    /// True when the run stopped early on cancellation
    pub cancelled: bool,
}

/// The record-extraction pipeline, generic over its fetcher and MIME
/// detector so tests can run it against local fixtures.
pub struct Pipeline<F, D = SignatureDetector> {
    fetcher: F,
    classifier: ContentClassifier<D>,
    sink: DocumentSink,
    variant: ArchiveVariant,
    quiet: bool,
    cancel: CancelToken,
}

impl<F: RangeFetch, D: DetectMime> Pipeline<F, D> {
    pub fn new(
        fetcher: F,
        classifier: ContentClassifier<D>,
        sink: DocumentSink,
        variant: ArchiveVariant,
    ) -> Self {
        Self {
            fetcher,
            classifier,
            sink,
            variant,
            quiet: false,
            cancel: CancelToken::new(),
        }
    }

    /// Suppress the per-document progress lines on stdout.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Token that stops the run between entries.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Process every entry sequentially.
    ///
    /// Per-entry failures are logged with their filename, offset, length,
    /// and failing stage, then recorded in the summary; they never abort
    /// the entries that follow.
    pub async fn run(&self, entries: &[IndexEntry]) -> RunSummary {
        let total = entries.len();
        let mut summary = RunSummary {
            total,
            ..Default::default()
        };

        for (i, entry) in entries.iter().enumerate() {
            if self.cancel.is_cancelled() {
                tracing::info!(processed = i, total, "cancelled, stopping before next entry");
                summary.cancelled = true;
                break;
            }

            match self.process_entry(entry).await {
                Ok(doc) => {
                    if !self.quiet {
                        println!("Processing [{}]: {}/{}", doc.target_url, i + 1, total);
                    }
                    summary.stored.push(doc);
                }
                Err(error) => {
                    tracing::warn!(
                        filename = %entry.filename,
                        offset = entry.offset,
                        length = entry.length,
                        stage = error.stage(),
                        error = %error,
                        "skipping entry"
                    );
                    summary.failures.push(EntryFailure {
                        entry: entry.clone(),
                        error,
                    });
                }
            }
        }

        summary
    }

    /// Run one entry through fetch → inflate → parse → classify → store.
    async fn process_entry(&self, entry: &IndexEntry) -> Result<StoredDocument, RecordError> {
        let object = self.variant.object_key(&entry.filename);

        let compressed = self
            .fetcher
            .fetch_range(&object, entry.offset, entry.length)
            .await?;
        let raw = warc::decode_member(&compressed)?;
        let record = warc::split_record(&raw)?;
        let target_url = warc::extract_target_uri(&record.warc_block)?;
        let classified = self.classifier.classify(&record.payload)?;

        let doc = self
            .sink
            .store(&target_url, &classified.extension, &record.payload)
            .await?;

        tracing::debug!(
            url = %doc.target_url,
            mime = %classified.mime_type,
            path = %doc.path.display(),
            "stored document"
        );
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::FileRangeFetcher;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;
    use std::path::Path;

    const WARC_NAME: &str =
        "crawl-data/CC-MAIN-2019-22/segments/1558232255773.51/warc/CC-MAIN-20190520061847-20190520083847-00558.warc.gz";

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn record_member(url: &str, payload: &[u8]) -> Vec<u8> {
        let mut record = format!(
            "WARC/1.0\r\n\
             WARC-Type: response\r\n\
             WARC-Target-URI: {url}\r\n\
             WARC-Payload-Digest: sha1:3I42H3S6NNFQ2MSVX7XZKYAYSCX5QBYJ\r\n\
             \r\n\
             HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\
             \r\n"
        )
        .into_bytes();
        record.extend_from_slice(payload);
        gzip(&record)
    }

    /// Lay `members` into one archive object under `root`, padding between
    /// them, and return the matching index entries.
    fn write_archive(root: &Path, object: &str, members: &[Vec<u8>]) -> Vec<IndexEntry> {
        let mut blob = Vec::new();
        let mut entries = Vec::new();
        for member in members {
            blob.extend_from_slice(b"PAD!");
            entries.push(IndexEntry {
                filename: object.to_string(),
                offset: blob.len() as u64,
                length: member.len() as u64,
            });
            blob.extend_from_slice(member);
        }

        let path = root.join(object);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, blob).unwrap();
        entries
    }

    fn pipeline(archive_root: &Path, out_dir: &Path) -> Pipeline<FileRangeFetcher> {
        Pipeline::new(
            FileRangeFetcher::new(archive_root),
            ContentClassifier::new(),
            DocumentSink::new(out_dir),
            ArchiveVariant::Full,
        )
        .quiet(true)
    }

    #[tokio::test]
    async fn stores_document_under_sanitized_url() {
        let archive = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();

        let entries = write_archive(
            archive.path(),
            WARC_NAME,
            &[record_member("https://innopolis.ru/", b"<html>hi</html>")],
        );

        let summary = pipeline(archive.path(), out.path()).run(&entries).await;

        assert_eq!(summary.stored.len(), 1);
        assert!(summary.failures.is_empty());

        let expected = out.path().join("https%58%47%47innopolis.ru%47.html");
        assert_eq!(std::fs::read(expected).unwrap(), b"<html>hi</html>");
    }

    #[tokio::test]
    async fn malformed_entry_skips_without_aborting_batch() {
        let archive = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();

        let good1 = record_member("https://a.com/", b"<html>one</html>");
        let bad = gzip(b"no separators in here at all");
        let good2 = record_member("https://b.com/", b"<html>three</html>");

        let entries = write_archive(archive.path(), WARC_NAME, &[good1, bad, good2]);
        let summary = pipeline(archive.path(), out.path()).run(&entries).await;

        assert_eq!(summary.stored.len(), 2);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].entry.offset, entries[1].offset);
        assert_eq!(summary.failures[0].error.stage(), "parse");
    }

    #[tokio::test]
    async fn unsupported_payload_type_is_a_classify_skip() {
        let archive = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();

        let png = record_member("https://a.com/logo", b"\x89PNG\r\n\x1a\n...");
        let entries = write_archive(archive.path(), WARC_NAME, &[png]);

        let summary = pipeline(archive.path(), out.path()).run(&entries).await;

        assert!(summary.stored.is_empty());
        assert_eq!(summary.failures[0].error.stage(), "classify");
    }

    #[tokio::test]
    async fn cancelled_token_stops_before_first_entry() {
        let archive = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();

        let entries = write_archive(
            archive.path(),
            WARC_NAME,
            &[record_member("https://a.com/", b"<html>x</html>")],
        );

        let pipeline = pipeline(archive.path(), out.path());
        pipeline.cancel_token().cancel();
        let summary = pipeline.run(&entries).await;

        assert!(summary.cancelled);
        assert!(summary.stored.is_empty());
        assert!(summary.failures.is_empty());
    }

    #[test]
    fn text_only_variant_rewrites_the_object_key() {
        let wet = ArchiveVariant::TextOnly.object_key(WARC_NAME);

        assert_eq!(
            wet,
            "crawl-data/CC-MAIN-2019-22/segments/1558232255773.51/wet/CC-MAIN-20190520061847-20190520083847-00558.warc.wet.gz"
        );
        assert_eq!(ArchiveVariant::Full.object_key(WARC_NAME), WARC_NAME);
    }
}
