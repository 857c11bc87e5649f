// arXiv Atom API connector.
// Docs: https://info.arxiv.org/help/api/user-manual.html

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;
use url::Url;

use litscout_common::{RawRecord, SourceKind};

use crate::Connector;

const API_URL: &str = "https://export.arxiv.org/api/query";

pub struct ArxivConnector {
    client: reqwest::Client,
    max_results: u32,
}

impl ArxivConnector {
    pub fn new(max_results: u32) -> Self {
        Self {
            client: crate::http_client(),
            max_results,
        }
    }
}

#[async_trait]
impl Connector for ArxivConnector {
    fn source(&self) -> SourceKind {
        SourceKind::Arxiv
    }

    fn build_query(&self, keywords: &[&str]) -> String {
        keywords
            .iter()
            .map(|kw| format!("all:\"{kw}\""))
            .collect::<Vec<_>>()
            .join(" OR ")
    }

    async fn search(&self, query: &str) -> Result<Vec<RawRecord>> {
        let url = Url::parse_with_params(
            API_URL,
            &[
                ("search_query", query),
                ("sortBy", "lastUpdatedDate"),
                ("max_results", &self.max_results.to_string()),
            ],
        )
        .context("Failed to build arXiv query URL")?;

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .context("arXiv request failed")?
            .error_for_status()
            .context("arXiv returned an error status")?;

        let bytes = resp.bytes().await.context("Failed to read arXiv response")?;
        let feed =
            feed_rs::parser::parse(&bytes[..]).context("Failed to parse arXiv Atom feed")?;

        let records: Vec<RawRecord> = feed.entries.into_iter().filter_map(map_entry).collect();
        info!(records = records.len(), "arxiv: query complete");
        Ok(records)
    }
}

fn map_entry(entry: feed_rs::model::Entry) -> Option<RawRecord> {
    let title = entry.title.map(|t| collapse_whitespace(&t.content))?;
    if title.is_empty() {
        return None;
    }

    let url = entry
        .links
        .first()
        .map(|l| l.href.clone())
        .or_else(|| entry.id.starts_with("http").then(|| entry.id.clone()));

    Some(RawRecord {
        title,
        abstract_text: entry.summary.map(|s| s.content),
        doi: None,
        url,
        source_id: arxiv_id(&entry.id),
        citation_count: None,
        published: entry
            .published
            .or(entry.updated)
            .map(|dt| dt.date_naive()),
        venue: None,
        source: SourceKind::Arxiv,
    })
}

/// Extract the bare arXiv id from an entry id like
/// `http://arxiv.org/abs/2403.01234v2`.
fn arxiv_id(entry_id: &str) -> Option<String> {
    let id = entry_id.rsplit("/abs/").next()?;
    if id == entry_id || id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

/// Atom titles from arXiv wrap across lines; collapse runs of whitespace.
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
