// Crossref works search connector.
// Docs: https://api.crossref.org/swagger-ui/index.html

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;
use url::Url;

use litscout_common::{RawRecord, SourceKind};

use crate::Connector;

const API_URL: &str = "https://api.crossref.org/works";

pub struct CrossrefConnector {
    client: reqwest::Client,
    rows: u32,
}

impl CrossrefConnector {
    pub fn new(rows: u32) -> Self {
        Self {
            client: crate::http_client(),
            rows,
        }
    }
}

#[async_trait]
impl Connector for CrossrefConnector {
    fn source(&self) -> SourceKind {
        SourceKind::Crossref
    }

    async fn search(&self, query: &str) -> Result<Vec<RawRecord>> {
        let url = Url::parse_with_params(
            API_URL,
            &[("query", query), ("rows", &self.rows.to_string())],
        )
        .context("Failed to build Crossref query URL")?;

        let resp: WorksResponse = self
            .client
            .get(url)
            .send()
            .await
            .context("Crossref request failed")?
            .error_for_status()
            .context("Crossref returned an error status")?
            .json()
            .await
            .context("Failed to parse Crossref response")?;

        let records: Vec<RawRecord> = resp
            .message
            .items
            .into_iter()
            .filter_map(map_item)
            .collect();
        info!(records = records.len(), "crossref: query complete");
        Ok(records)
    }
}

#[derive(Debug, Deserialize)]
struct WorksResponse {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    #[serde(default)]
    title: Vec<String>,
    #[serde(rename = "DOI")]
    doi: Option<String>,
    #[serde(rename = "URL")]
    url: Option<String>,
    #[serde(rename = "is-referenced-by-count")]
    is_referenced_by_count: Option<u32>,
    #[serde(rename = "container-title", default)]
    container_title: Vec<String>,
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
    #[serde(rename = "published-print")]
    published_print: Option<DateField>,
    #[serde(rename = "published-online")]
    published_online: Option<DateField>,
}

#[derive(Debug, Deserialize)]
struct DateField {
    #[serde(rename = "date-parts", default)]
    date_parts: Vec<Vec<u32>>,
}

impl DateField {
    /// Crossref dates come as `[[year, month?, day?]]`; missing parts
    /// default to 1.
    fn to_naive_date(&self) -> Option<NaiveDate> {
        let parts = self.date_parts.first()?;
        let year = *parts.first()? as i32;
        let month = parts.get(1).copied().unwrap_or(1);
        let day = parts.get(2).copied().unwrap_or(1);
        NaiveDate::from_ymd_opt(year, month, day)
    }
}

fn map_item(item: Item) -> Option<RawRecord> {
    let title = item
        .title
        .into_iter()
        .next()
        .filter(|t| !t.trim().is_empty())?;

    let published = item
        .published_print
        .as_ref()
        .and_then(DateField::to_naive_date)
        .or_else(|| {
            item.published_online
                .as_ref()
                .and_then(DateField::to_naive_date)
        });

    Some(RawRecord {
        title,
        abstract_text: item.abstract_text,
        doi: item.doi,
        url: item.url,
        source_id: None,
        citation_count: item.is_referenced_by_count,
        published,
        venue: item.container_title.into_iter().next(),
        source: SourceKind::Crossref,
    })
}
