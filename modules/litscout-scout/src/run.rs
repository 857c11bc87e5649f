// Run orchestration: assemble the pipeline from config, aggregate, rank,
// dispatch, persist. One invocation is one complete monitoring cycle.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use litscout_common::{Config, FileConfig};
use litscout_notify::{Channel, Dispatcher, SlackChannel, TelegramChannel};
use litscout_sources::{
    ArxivConnector, Connector, CrossrefConnector, OpenAlexConnector, SemanticScholarConnector,
};

use crate::aggregate::{Aggregator, RunStats};
use crate::archive::ArchiveStore;
use crate::classify::Classifier;
use crate::dashboard::render_dashboard;
use crate::digest::render_digest;
use crate::rank::rank_and_trim;
use crate::seen::SeenStore;

pub struct ScoutRun {
    pub env: Config,
    pub file: FileConfig,
    pub dry_run: bool,
    pub dashboard_out: Option<PathBuf>,
}

impl ScoutRun {
    pub async fn execute(self) -> Result<RunStats> {
        let taxonomy = self.file.taxonomy()?;
        let classifier = Classifier::new(&taxonomy, self.file.classifier)?;

        let connectors = build_connectors(&self.env, self.file.pipeline.max_results_per_query);
        let channels = build_channels(&self.env);
        info!(
            connectors = connectors.len(),
            channels = channels.len(),
            domains = taxonomy.domain_count(),
            "Pipeline assembled"
        );

        std::fs::create_dir_all(&self.env.state_dir).with_context(|| {
            format!(
                "Failed to create state dir {}",
                self.env.state_dir.display()
            )
        })?;
        let seen_store = SeenStore::new(self.env.state_dir.join("seen.json"));
        let archive_store = ArchiveStore::new(self.env.state_dir.join("archive.json"));
        let mut seen = seen_store.load();
        let mut archive = archive_store.load();

        let today = Utc::now().date_naive();
        let aggregator = Aggregator::new(&taxonomy, &classifier, self.file.pipeline, today);
        let outcome = aggregator.run(&connectors, &mut seen).await;

        let ranked = rank_and_trim(outcome.items.clone(), self.file.pipeline.digest_byte_budget);
        if ranked.len() < outcome.items.len() {
            info!(
                kept = ranked.len(),
                total = outcome.items.len(),
                "Digest trimmed to byte budget"
            );
        }
        let digest = render_digest(&ranked, today);

        if self.dry_run {
            info!("Dry run, printing digest instead of dispatching");
            println!("{digest}");
        } else if channels.is_empty() {
            warn!("No notification channels configured, digest not sent");
        } else {
            let dispatch = Dispatcher::new(self.file.notify)
                .dispatch(&channels, &digest)
                .await;
            info!(
                chunks_sent = dispatch.chunks_sent,
                chunks_failed = dispatch.chunks_failed,
                channels_failed = dispatch.channels_failed,
                "Dispatch complete"
            );
        }

        // Marked keys are persisted even when dispatch partially failed:
        // re-sending a whole digest next run is worse than one lost chunk.
        let added = archive.merge(&outcome.items);
        seen_store.persist(&seen)?;
        archive_store.persist(&archive)?;
        info!(added, total = archive.len(), "Archive merged");

        if let Some(path) = &self.dashboard_out {
            let html = render_dashboard(&archive, today);
            std::fs::write(path, html)
                .with_context(|| format!("Failed to write dashboard {}", path.display()))?;
            info!(path = %path.display(), "Dashboard written");
        }

        info!("{}", outcome.stats);
        Ok(outcome.stats)
    }
}

fn build_connectors(env: &Config, max_results: u32) -> Vec<Box<dyn Connector>> {
    let mut connectors: Vec<Box<dyn Connector>> = vec![
        Box::new(ArxivConnector::new(max_results)),
        Box::new(OpenAlexConnector::new(max_results)),
        Box::new(CrossrefConnector::new(max_results)),
    ];
    match &env.s2_api_key {
        Some(key) => connectors.push(Box::new(SemanticScholarConnector::new(key, max_results))),
        None => info!("S2_API_KEY not set, skipping Semantic Scholar"),
    }
    connectors
}

fn build_channels(env: &Config) -> Vec<Box<dyn Channel>> {
    let mut channels: Vec<Box<dyn Channel>> = Vec::new();
    if let (Some(token), Some(chat_id)) = (&env.telegram_bot_token, &env.telegram_chat_id) {
        channels.push(Box::new(TelegramChannel::new(token, chat_id)));
    } else {
        info!("Telegram credentials not set, channel skipped");
    }
    if let Some(url) = &env.slack_webhook_url {
        channels.push(Box::new(SlackChannel::new(url)));
    } else {
        info!("SLACK_WEBHOOK_URL not set, channel skipped");
    }
    channels
}
