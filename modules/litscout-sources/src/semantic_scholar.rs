// Semantic Scholar graph API connector.
// Docs: https://api.semanticscholar.org/api-docs/graph
//
// Only constructed when an API key is configured; without one the source is
// skipped entirely rather than hammering the anonymous rate limit.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;
use url::Url;

use litscout_common::{RawRecord, SourceKind};

use crate::Connector;

const API_URL: &str = "https://api.semanticscholar.org/graph/v1/paper/search";
const FIELDS: &str = "title,abstract,url,citationCount,venue,year,externalIds";

pub struct SemanticScholarConnector {
    client: reqwest::Client,
    api_key: String,
    limit: u32,
}

impl SemanticScholarConnector {
    pub fn new(api_key: impl Into<String>, limit: u32) -> Self {
        Self {
            client: crate::http_client(),
            api_key: api_key.into(),
            limit,
        }
    }
}

#[async_trait]
impl Connector for SemanticScholarConnector {
    fn source(&self) -> SourceKind {
        SourceKind::SemanticScholar
    }

    async fn search(&self, query: &str) -> Result<Vec<RawRecord>> {
        let url = Url::parse_with_params(
            API_URL,
            &[
                ("query", query),
                ("limit", &self.limit.to_string()),
                ("fields", FIELDS),
            ],
        )
        .context("Failed to build Semantic Scholar query URL")?;

        let resp: SearchResponse = self
            .client
            .get(url)
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .context("Semantic Scholar request failed")?
            .error_for_status()
            .context("Semantic Scholar returned an error status")?
            .json()
            .await
            .context("Failed to parse Semantic Scholar response")?;

        let records: Vec<RawRecord> = resp.data.into_iter().filter_map(map_paper).collect();
        info!(records = records.len(), "semantic_scholar: query complete");
        Ok(records)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Paper>,
}

#[derive(Debug, Deserialize)]
struct Paper {
    title: Option<String>,
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
    url: Option<String>,
    #[serde(rename = "paperId")]
    paper_id: Option<String>,
    #[serde(rename = "citationCount")]
    citation_count: Option<u32>,
    venue: Option<String>,
    year: Option<i32>,
    #[serde(rename = "externalIds")]
    external_ids: Option<ExternalIds>,
}

#[derive(Debug, Deserialize)]
struct ExternalIds {
    #[serde(rename = "DOI")]
    doi: Option<String>,
}

fn map_paper(paper: Paper) -> Option<RawRecord> {
    let title = paper.title.filter(|t| !t.trim().is_empty())?;

    Some(RawRecord {
        title,
        abstract_text: paper.abstract_text,
        doi: paper.external_ids.and_then(|ids| ids.doi),
        url: paper.url,
        source_id: paper.paper_id,
        citation_count: paper.citation_count,
        // The search endpoint only exposes a year; pin to Jan 1 so the
        // recency filter can still reason about it.
        published: paper.year.and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1)),
        venue: paper.venue.filter(|v| !v.trim().is_empty()),
        source: SourceKind::SemanticScholar,
    })
}
