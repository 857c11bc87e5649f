use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::taxonomy::KeywordTaxonomy;

/// TOML-backed configuration loaded from disk: the keyword taxonomy plus
/// classifier, pipeline, and notification tuning. Secrets (bot tokens, API
/// keys) stay as env vars.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub taxonomy: TaxonomyConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaxonomyConfig {
    /// Domain name -> keyword list.
    pub domains: BTreeMap<String, Vec<String>>,
    /// Which domains are "method" axes (techniques) rather than "subject"
    /// axes (topics/materials). Drives AND-mode tiering.
    #[serde(default)]
    pub method_domains: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierMode {
    /// Primary requires a subject match AND a method match; subject alone is
    /// Secondary.
    #[default]
    SubjectAndMethod,
    /// Purely score-driven tiering against the configured thresholds.
    Threshold,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub mode: ClassifierMode,
    /// Score at or above which an item is Primary (threshold mode).
    #[serde(default = "default_primary_threshold")]
    pub primary_threshold: u32,
    /// Score at or above which an item is Secondary (threshold mode).
    #[serde(default = "default_secondary_threshold")]
    pub secondary_threshold: u32,
    /// Score added per keyword found in the title.
    #[serde(default = "default_title_weight")]
    pub title_weight: u32,
    /// Score added per keyword found in title+abstract text.
    #[serde(default = "default_abstract_weight")]
    pub abstract_weight: u32,
    /// Citation count above which the citation bonus applies.
    #[serde(default = "default_citation_threshold")]
    pub citation_threshold: u32,
    #[serde(default = "default_citation_bonus")]
    pub citation_bonus: u32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            mode: ClassifierMode::default(),
            primary_threshold: default_primary_threshold(),
            secondary_threshold: default_secondary_threshold(),
            title_weight: default_title_weight(),
            abstract_weight: default_abstract_weight(),
            citation_threshold: default_citation_threshold(),
            citation_bonus: default_citation_bonus(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Records older than this many days are dropped before classification.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
    /// Byte budget for the outgoing digest. Items past the cutoff still
    /// reach the archive.
    #[serde(default = "default_digest_byte_budget")]
    pub digest_byte_budget: usize,
    /// Keywords per OR-group query. Provider query languages cap clause
    /// counts, so keyword lists are chunked and queried in batches.
    #[serde(default = "default_query_chunk_size")]
    pub query_chunk_size: usize,
    /// Result cap requested per query.
    #[serde(default = "default_max_results_per_query")]
    pub max_results_per_query: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            lookback_days: default_lookback_days(),
            digest_byte_budget: default_digest_byte_budget(),
            query_chunk_size: default_query_chunk_size(),
            max_results_per_query: default_max_results_per_query(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotifyConfig {
    /// Retries per chunk after the first attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Linear backoff step between retries, in seconds.
    #[serde(default = "default_backoff_secs")]
    pub backoff_secs: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff_secs: default_backoff_secs(),
        }
    }
}

fn default_primary_threshold() -> u32 {
    10
}
fn default_secondary_threshold() -> u32 {
    5
}
fn default_title_weight() -> u32 {
    5
}
fn default_abstract_weight() -> u32 {
    3
}
fn default_citation_threshold() -> u32 {
    10
}
fn default_citation_bonus() -> u32 {
    2
}
fn default_lookback_days() -> u32 {
    3
}
fn default_digest_byte_budget() -> usize {
    3500
}
fn default_query_chunk_size() -> usize {
    20
}
fn default_max_results_per_query() -> u32 {
    10
}
fn default_max_retries() -> u32 {
    2
}
fn default_backoff_secs() -> u64 {
    2
}

impl FileConfig {
    /// Build the validated taxonomy from the raw config table.
    pub fn taxonomy(&self) -> Result<KeywordTaxonomy> {
        Ok(KeywordTaxonomy::new(
            self.taxonomy.domains.clone(),
            self.taxonomy.method_domains.clone(),
        )?)
    }
}

/// Load and parse a TOML config file. A missing or invalid file is fatal:
/// the monitor cannot run without a keyword taxonomy.
pub fn load_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: FileConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}
