// End-to-end pipeline scenarios: scripted connectors in, in-memory
// notification channel out, real classifier/seen-set/archive in between.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use litscout_common::{
    CanonicalKey, ClassifierConfig, KeywordTaxonomy, NotifyConfig, PipelineConfig, RawRecord,
    SourceKind, Tier,
};
use litscout_notify::{Channel, Dispatcher};
use litscout_scout::{
    digest::render_digest, rank_and_trim, Aggregator, Archive, Classifier, SeenSet,
};
use litscout_sources::Connector;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

fn taxonomy() -> KeywordTaxonomy {
    let mut domains = BTreeMap::new();
    domains.insert(
        "materials".to_string(),
        vec!["perovskite".to_string(), "solid electrolyte".to_string()],
    );
    domains.insert("ai_methods".to_string(), vec!["neural network".to_string()]);
    KeywordTaxonomy::new(domains, vec!["ai_methods".to_string()]).unwrap()
}

fn record(title: &str, doi: &str) -> RawRecord {
    RawRecord {
        title: title.into(),
        abstract_text: None,
        doi: Some(doi.into()),
        url: None,
        source_id: None,
        citation_count: None,
        published: Some(today()),
        venue: None,
        source: SourceKind::Crossref,
    }
}

struct ScriptedConnector {
    source: SourceKind,
    records: Vec<RawRecord>,
}

#[async_trait]
impl Connector for ScriptedConnector {
    fn source(&self) -> SourceKind {
        self.source
    }

    async fn search(&self, _query: &str) -> Result<Vec<RawRecord>> {
        Ok(self.records.clone())
    }
}

struct DownConnector;

#[async_trait]
impl Connector for DownConnector {
    fn source(&self) -> SourceKind {
        SourceKind::OpenAlex
    }

    async fn search(&self, _query: &str) -> Result<Vec<RawRecord>> {
        anyhow::bail!("connection refused")
    }
}

#[derive(Clone)]
struct MemoryChannel {
    sent: Arc<Mutex<Vec<String>>>,
}

impl MemoryChannel {
    fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Channel for MemoryChannel {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn max_bytes(&self) -> usize {
        4096
    }

    async fn send(&self, chunk: &str) -> Result<()> {
        self.sent.lock().unwrap().push(chunk.to_string());
        Ok(())
    }
}

async fn aggregate(
    connectors: Vec<Box<dyn Connector>>,
    seen: &mut SeenSet,
) -> litscout_scout::AggregateOutcome {
    let taxonomy = taxonomy();
    let classifier = Classifier::new(&taxonomy, ClassifierConfig::default()).unwrap();
    let aggregator = Aggregator::new(&taxonomy, &classifier, PipelineConfig::default(), today());
    aggregator.run(&connectors, seen).await
}

fn fast_notify() -> NotifyConfig {
    NotifyConfig {
        max_retries: 1,
        backoff_secs: 0,
    }
}

#[tokio::test]
async fn subject_and_method_tiering_ranks_primary_first() {
    let records = vec![
        record("Perovskite thin films by spin coating", "10.1/b"),
        record("Neural network screening of perovskite electrolytes", "10.1/a"),
        record("Neural network pruning at scale", "10.1/c"),
    ];
    let mut seen = SeenSet::default();

    let outcome = aggregate(
        vec![Box::new(ScriptedConnector {
            source: SourceKind::Crossref,
            records,
        })],
        &mut seen,
    )
    .await;

    // Subject+method is Primary, subject alone Secondary, method alone dropped.
    assert_eq!(outcome.items.len(), 2);
    assert_eq!(outcome.stats.unclassified, 1);

    let ranked = rank_and_trim(outcome.items, usize::MAX);
    assert_eq!(ranked[0].tier, Tier::Primary);
    assert!(ranked[0].title.contains("screening"));
    assert_eq!(ranked[1].tier, Tier::Secondary);
}

#[tokio::test]
async fn seen_dedup_survives_case_and_whitespace_variants() {
    let mut seen = SeenSet::default();
    seen.mark(CanonicalKey::new("10.1000/abc"));

    let outcome = aggregate(
        vec![Box::new(ScriptedConnector {
            source: SourceKind::Crossref,
            records: vec![record("Perovskite device study", " 10.1000/ABC ")],
        })],
        &mut seen,
    )
    .await;

    assert!(outcome.items.is_empty());
    assert_eq!(outcome.stats.already_seen, 1);

    // The empty digest still goes out, but names nothing.
    let channel = MemoryChannel::new();
    let channels: Vec<Box<dyn Channel>> = vec![Box::new(channel.clone())];
    let digest = render_digest(&outcome.items, today());
    Dispatcher::new(fast_notify())
        .dispatch(&channels, &digest)
        .await;

    let sent = channel.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("No new publications"));
}

#[tokio::test]
async fn notified_once_across_consecutive_runs() {
    let connector = || -> Vec<Box<dyn Connector>> {
        vec![Box::new(ScriptedConnector {
            source: SourceKind::Crossref,
            records: vec![record("Perovskite device study", "10.1/once")],
        })]
    };
    let mut seen = SeenSet::default();

    let first = aggregate(connector(), &mut seen).await;
    assert_eq!(first.items.len(), 1);

    let second = aggregate(connector(), &mut seen).await;
    assert!(second.items.is_empty());
    assert_eq!(second.stats.already_seen, 1);
}

#[tokio::test]
async fn failed_source_still_notifies_and_archives_the_rest() {
    let records = vec![
        record("Neural network screening of perovskite cells", "10.1/p1"),
        record("Perovskite crystallization pathways", "10.1/p2"),
        record("Solid electrolyte interphase imaging", "10.1/p3"),
        record("Lattice QCD at finite temperature", "10.1/x1"),
        record("Neural network inference accelerators", "10.1/x2"),
    ];
    let mut seen = SeenSet::default();

    let outcome = aggregate(
        vec![
            Box::new(DownConnector),
            Box::new(ScriptedConnector {
                source: SourceKind::Crossref,
                records,
            }),
        ],
        &mut seen,
    )
    .await;

    assert_eq!(outcome.stats.sources_failed, 1);
    assert_eq!(outcome.items.len(), 3);

    let ranked = rank_and_trim(outcome.items.clone(), PipelineConfig::default().digest_byte_budget);
    let digest = render_digest(&ranked, today());

    let channel = MemoryChannel::new();
    let channels: Vec<Box<dyn Channel>> = vec![Box::new(channel.clone())];
    let stats = Dispatcher::new(fast_notify())
        .dispatch(&channels, &digest)
        .await;
    assert_eq!(stats.channels_failed, 0);

    let sent = channel.sent().join("\n");
    assert!(sent.contains("screening of perovskite cells"));
    assert!(sent.contains("crystallization pathways"));
    assert!(sent.contains("interphase imaging"));

    let mut archive = Archive::default();
    assert_eq!(archive.merge(&outcome.items), 3);
}

#[tokio::test]
async fn digest_trim_never_drops_items_from_the_archive() {
    let records: Vec<RawRecord> = (0..20)
        .map(|n| {
            record(
                &format!("Perovskite photoluminescence dataset volume {n}"),
                &format!("10.1/bulk{n}"),
            )
        })
        .collect();
    let mut seen = SeenSet::default();

    let outcome = aggregate(
        vec![Box::new(ScriptedConnector {
            source: SourceKind::Crossref,
            records,
        })],
        &mut seen,
    )
    .await;
    assert_eq!(outcome.items.len(), 20);

    // A budget that fits only a few lines.
    let ranked = rank_and_trim(outcome.items.clone(), 300);
    assert!(ranked.len() < outcome.items.len());
    assert!(render_digest(&ranked, today()).len() <= 300 + 128);

    let mut archive = Archive::default();
    assert_eq!(archive.merge(&outcome.items), 20);
}
