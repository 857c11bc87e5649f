// Connectors for external bibliographic APIs.
//
// Each connector owns transport and record mapping only; query composition
// (keyword chunking) happens in the aggregator. A connector failure is an
// `Err`, distinct from `Ok(vec![])` ("no matches"), so the caller can log
// and continue instead of misreading an outage as an empty day.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use litscout_common::{RawRecord, SourceKind};

pub mod arxiv;
pub mod crossref;
pub mod openalex;
pub mod semantic_scholar;

pub use arxiv::ArxivConnector;
pub use crossref::CrossrefConnector;
pub use openalex::OpenAlexConnector;
pub use semantic_scholar::SemanticScholarConnector;

pub(crate) const USER_AGENT: &str = "litscout/0.1";
pub(crate) const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

#[async_trait]
pub trait Connector: Send + Sync {
    fn source(&self) -> SourceKind;

    /// Render one OR-group of keywords in this provider's query syntax.
    fn build_query(&self, keywords: &[&str]) -> String {
        keywords.join(" OR ")
    }

    /// Run one query. No ordering or completeness guarantees.
    async fn search(&self, query: &str) -> Result<Vec<RawRecord>>;
}

pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .expect("Failed to build HTTP client")
}
