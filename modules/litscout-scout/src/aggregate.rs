// Source aggregation: query every connector, funnel records through
// identity -> seen -> recency -> classification, and mark accepted keys.
//
// Connectors run sequentially. One failing source is logged and skipped;
// the run always produces whatever the surviving sources returned.

use chrono::{Duration, NaiveDate};
use tracing::{info, warn};

use litscout_common::{ClassifiedItem, KeywordTaxonomy, PipelineConfig, Tier};
use litscout_sources::Connector;

use crate::classify::Classifier;
use crate::identity::canonicalize;
use crate::seen::SeenSet;

#[derive(Debug, Default, Clone)]
pub struct RunStats {
    pub sources_queried: u32,
    pub sources_failed: u32,
    pub queries_issued: u32,
    pub records_fetched: u32,
    pub no_identity: u32,
    pub already_seen: u32,
    pub stale: u32,
    pub unclassified: u32,
    pub classified_primary: u32,
    pub classified_secondary: u32,
}

impl RunStats {
    pub fn classified(&self) -> u32 {
        self.classified_primary + self.classified_secondary
    }
}

impl std::fmt::Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== LitScout Run ===")?;
        writeln!(f, "Sources queried:  {}", self.sources_queried)?;
        writeln!(f, "Sources failed:   {}", self.sources_failed)?;
        writeln!(f, "Queries issued:   {}", self.queries_issued)?;
        writeln!(f, "Records fetched:  {}", self.records_fetched)?;
        writeln!(f, "No identity:      {}", self.no_identity)?;
        writeln!(f, "Already seen:     {}", self.already_seen)?;
        writeln!(f, "Too old:          {}", self.stale)?;
        writeln!(f, "Unclassified:     {}", self.unclassified)?;
        writeln!(
            f,
            "Classified:       {} ({} primary, {} secondary)",
            self.classified(),
            self.classified_primary,
            self.classified_secondary
        )?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct AggregateOutcome {
    pub items: Vec<ClassifiedItem>,
    pub stats: RunStats,
}

pub struct Aggregator<'a> {
    taxonomy: &'a KeywordTaxonomy,
    classifier: &'a Classifier,
    pipeline: PipelineConfig,
    today: NaiveDate,
}

impl<'a> Aggregator<'a> {
    pub fn new(
        taxonomy: &'a KeywordTaxonomy,
        classifier: &'a Classifier,
        pipeline: PipelineConfig,
        today: NaiveDate,
    ) -> Self {
        Self {
            taxonomy,
            classifier,
            pipeline,
            today,
        }
    }

    pub async fn run(
        &self,
        connectors: &[Box<dyn Connector>],
        seen: &mut SeenSet,
    ) -> AggregateOutcome {
        let mut stats = RunStats::default();
        let mut items = Vec::new();

        let keywords: Vec<&str> = self.taxonomy.all_keywords().collect();
        let chunk_size = self.pipeline.query_chunk_size.max(1);
        let cutoff = self.today - Duration::days(i64::from(self.pipeline.lookback_days));

        for connector in connectors {
            stats.sources_queried += 1;
            let source = connector.source();
            let mut fetched = Vec::new();
            let mut failed = false;

            for chunk in keywords.chunks(chunk_size) {
                let query = connector.build_query(chunk);
                stats.queries_issued += 1;
                match connector.search(&query).await {
                    Ok(records) => fetched.extend(records),
                    Err(e) => {
                        warn!(source = %source, error = %e, "Source query failed, skipping source");
                        failed = true;
                        break;
                    }
                }
            }

            if failed {
                stats.sources_failed += 1;
                continue;
            }

            info!(source = %source, records = fetched.len(), "Source fetch complete");
            stats.records_fetched += fetched.len() as u32;

            for record in fetched {
                let Some(key) = canonicalize(&record) else {
                    stats.no_identity += 1;
                    continue;
                };

                if seen.contains(&key) {
                    stats.already_seen += 1;
                    continue;
                }

                // Records without a date cannot be judged stale; keep them.
                if record.published.is_some_and(|d| d < cutoff) {
                    stats.stale += 1;
                    continue;
                }

                let Some((tier, score)) = self.classifier.classify(
                    &record.title,
                    record.abstract_text.as_deref(),
                    record.citation_count,
                ) else {
                    stats.unclassified += 1;
                    continue;
                };

                seen.mark(key.clone());
                match tier {
                    Tier::Primary => stats.classified_primary += 1,
                    Tier::Secondary => stats.classified_secondary += 1,
                }
                items.push(ClassifiedItem {
                    key,
                    title: record.title,
                    source: record.source,
                    venue: record.venue,
                    published: record.published,
                    tier,
                    score,
                });
            }
        }

        AggregateOutcome { items, stats }
    }
}
