//! # ccfetch
//!
//! Fetch individual documents from Common Crawl archives using HTTP Range
//! requests.
//!
//! This library looks up captures of a URL pattern in a crawl's index, then
//! retrieves each record as a ranged slice of the multi-gigabyte WARC/WET
//! object that holds it — no full-archive download. Each slice is an
//! independently decompressible gzip member; the inflated record yields the
//! originally fetched document and its source URL, which is classified by
//! content and written to disk under a URL-derived filename.
//!
//! ## Features
//!
//! - Index lookup: every capture of a URL pattern in a dated crawl
//! - Ranged retrieval of single records from remote archive storage
//! - Full WARC and extracted-text (WET) archive variants
//! - Content classification by byte inspection, with a configurable
//!   MIME→extension table
//! - Best-effort batches: one bad record never aborts the run
//!
//! ## Example
//!
//! ```no_run
//! use ccfetch::{
//!     ArchiveVariant, ContentClassifier, DocumentSink, HttpRangeFetcher, IndexClient, Pipeline,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let index = IndexClient::new("http://index.commoncrawl.org")?;
//!     let entries = index
//!         .lookup("CC-MAIN-2019-22", "https://innopolis.ru/*")
//!         .await?;
//!
//!     let pipeline = Pipeline::new(
//!         HttpRangeFetcher::new("https://commoncrawl.s3.amazonaws.com")?,
//!         ContentClassifier::new(),
//!         DocumentSink::new("data"),
//!         ArchiveVariant::Full,
//!     );
//!
//!     let summary = pipeline.run(&entries).await;
//!     println!("saved {} of {}", summary.stored.len(), summary.total);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod index;
pub mod io;
pub mod mime;
pub mod pipeline;
pub mod sink;
pub mod warc;

pub use cli::Cli;
pub use index::{IndexClient, IndexEntry};
pub use io::{FileRangeFetcher, HttpRangeFetcher, RangeFetch, Retrying};
pub use mime::{Classified, ContentClassifier, DetectMime, SignatureDetector};
pub use pipeline::{ArchiveVariant, CancelToken, EntryFailure, Pipeline, RunSummary};
pub use sink::{DocumentSink, StoredDocument, sanitize_url};
