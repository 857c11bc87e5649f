// OpenAlex works search connector.
// Docs: https://docs.openalex.org/api-entities/works

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;
use url::Url;

use litscout_common::{RawRecord, SourceKind};

use crate::Connector;

const API_URL: &str = "https://api.openalex.org/works";

pub struct OpenAlexConnector {
    client: reqwest::Client,
    per_page: u32,
}

impl OpenAlexConnector {
    pub fn new(per_page: u32) -> Self {
        Self {
            client: crate::http_client(),
            per_page,
        }
    }
}

#[async_trait]
impl Connector for OpenAlexConnector {
    fn source(&self) -> SourceKind {
        SourceKind::OpenAlex
    }

    async fn search(&self, query: &str) -> Result<Vec<RawRecord>> {
        let url = Url::parse_with_params(
            API_URL,
            &[("search", query), ("per-page", &self.per_page.to_string())],
        )
        .context("Failed to build OpenAlex query URL")?;

        let resp: WorksResponse = self
            .client
            .get(url)
            .send()
            .await
            .context("OpenAlex request failed")?
            .error_for_status()
            .context("OpenAlex returned an error status")?
            .json()
            .await
            .context("Failed to parse OpenAlex response")?;

        let records: Vec<RawRecord> = resp.results.into_iter().filter_map(map_work).collect();
        info!(records = records.len(), "openalex: query complete");
        Ok(records)
    }
}

#[derive(Debug, Deserialize)]
struct WorksResponse {
    #[serde(default)]
    results: Vec<Work>,
}

#[derive(Debug, Deserialize)]
struct Work {
    title: Option<String>,
    doi: Option<String>,
    /// The OpenAlex work URL (e.g. `https://openalex.org/W2741809807`).
    id: Option<String>,
    cited_by_count: Option<u32>,
    publication_date: Option<String>,
    primary_location: Option<Location>,
}

#[derive(Debug, Deserialize)]
struct Location {
    source: Option<LocationSource>,
}

#[derive(Debug, Deserialize)]
struct LocationSource {
    display_name: Option<String>,
}

fn map_work(work: Work) -> Option<RawRecord> {
    let title = work.title.filter(|t| !t.trim().is_empty())?;

    Some(RawRecord {
        title,
        abstract_text: None,
        doi: work.doi,
        url: work.id,
        source_id: None,
        citation_count: work.cited_by_count,
        published: work
            .publication_date
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()),
        venue: work
            .primary_location
            .and_then(|l| l.source)
            .and_then(|s| s.display_name),
        source: SourceKind::OpenAlex,
    })
}
