//! Index-lookup collaborator.
//!
//! The crawl index service answers a URL pattern with newline-delimited
//! JSON, one object per archived capture. Only `filename`, `offset`, and
//! `length` matter to the pipeline; every other field of an index object is
//! crawl metadata and is ignored.

use reqwest::Client;
use serde::{Deserialize, Deserializer};
use std::time::Duration;

use crate::error::IndexError;

/// One pointer into a crawl archive: remote object key plus byte range.
///
/// Invariant: `offset + length - 1` addresses a valid byte of the named
/// object. Entries are immutable and consumed once per pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IndexEntry {
    /// Remote object key, e.g. `crawl-data/CC-MAIN-.../file.warc.gz`
    pub filename: String,
    /// First byte of the record inside the object
    #[serde(deserialize_with = "string_or_u64")]
    pub offset: u64,
    /// Compressed record length in bytes
    #[serde(deserialize_with = "string_or_u64")]
    pub length: u64,
}

/// The index service encodes integers as JSON strings; accept both forms.
fn string_or_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u64),
        Str(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n),
        Raw::Str(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

/// Client for the crawl index service.
pub struct IndexClient {
    client: Client,
    base_url: String,
}

impl IndexClient {
    /// Client for the given index endpoint
    /// (e.g. `http://index.commoncrawl.org`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Look up every capture of `url_pattern` in the named crawl.
    ///
    /// Failure here is run-fatal, unlike per-entry pipeline errors: with no
    /// index entries there is no work to attempt.
    pub async fn lookup(
        &self,
        crawl: &str,
        url_pattern: &str,
    ) -> Result<Vec<IndexEntry>, IndexError> {
        let url = format!("{}/{}-index", self.base_url, crawl);

        let resp = self
            .client
            .get(&url)
            .query(&[("url", url_pattern), ("output", "json")])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(IndexError::Status(resp.status()));
        }

        let body = resp.text().await?;
        let mut entries = Vec::new();
        for line in body.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            entries.push(serde_json::from_str(line)?);
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const INDEX_LINE: &str = r#"{"urlkey": "ru,innopolis)/", "timestamp": "20190520070549", "url": "https://innopolis.ru/", "mime": "text/html", "status": "200", "digest": "3I42H3S6NNFQ2MSVX7XZKYAYSCX5QBYJ", "length": "4153", "offset": "593870", "filename": "crawl-data/CC-MAIN-2019-22/segments/1558232255773.51/warc/CC-MAIN-20190520061847-20190520083847-00558.warc.gz"}"#;

    #[test]
    fn entry_parses_string_encoded_integers_and_ignores_extras() {
        let entry: IndexEntry = serde_json::from_str(INDEX_LINE).unwrap();

        assert_eq!(entry.offset, 593_870);
        assert_eq!(entry.length, 4153);
        assert!(entry.filename.ends_with("00558.warc.gz"));
    }

    #[test]
    fn entry_accepts_numeric_integers_too() {
        let entry: IndexEntry = serde_json::from_str(
            r#"{"filename": "f.warc.gz", "offset": 10, "length": 20}"#,
        )
        .unwrap();

        assert_eq!((entry.offset, entry.length), (10, 20));
    }

    #[tokio::test]
    async fn lookup_decodes_newline_delimited_entries() {
        let server = MockServer::start().await;

        let body = format!("{INDEX_LINE}\n{INDEX_LINE}\n");
        Mock::given(method("GET"))
            .and(path("/CC-MAIN-2019-22-index"))
            .and(query_param("url", "https://innopolis.ru/*"))
            .and(query_param("output", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let client = IndexClient::new(server.uri()).unwrap();
        let entries = client
            .lookup("CC-MAIN-2019-22", "https://innopolis.ru/*")
            .await
            .unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].offset, 593_870);
    }

    #[tokio::test]
    async fn lookup_surfaces_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/CC-MAIN-2019-22-index"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = IndexClient::new(server.uri()).unwrap();
        let err = client.lookup("CC-MAIN-2019-22", "x").await.unwrap_err();

        assert!(matches!(err, IndexError::Status(s) if s.as_u16() == 503));
    }

    #[tokio::test]
    async fn lookup_rejects_malformed_lines() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/CC-MAIN-2019-22-index"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json\n"))
            .mount(&server)
            .await;

        let client = IndexClient::new(server.uri()).unwrap();
        let err = client.lookup("CC-MAIN-2019-22", "x").await.unwrap_err();

        assert!(matches!(err, IndexError::Json(_)));
    }
}
