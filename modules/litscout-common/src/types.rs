use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// --- Sources ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Arxiv,
    OpenAlex,
    Crossref,
    SemanticScholar,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Arxiv => write!(f, "arxiv"),
            SourceKind::OpenAlex => write!(f, "openalex"),
            SourceKind::Crossref => write!(f, "crossref"),
            SourceKind::SemanticScholar => write!(f, "semantic_scholar"),
        }
    }
}

impl SourceKind {
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "arxiv" => Some(Self::Arxiv),
            "openalex" | "open_alex" => Some(Self::OpenAlex),
            "crossref" => Some(Self::Crossref),
            "semantic_scholar" | "semanticscholar" | "s2" => Some(Self::SemanticScholar),
            _ => None,
        }
    }
}

// --- Raw connector output ---

/// A publication record as returned by a connector, before canonicalization.
/// Everything beyond the title is best-effort: providers differ wildly in
/// which fields they populate.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub title: String,
    pub abstract_text: Option<String>,
    pub doi: Option<String>,
    pub url: Option<String>,
    /// Source-local identifier (e.g. an arXiv id). Only meaningful within
    /// the producing source.
    pub source_id: Option<String>,
    pub citation_count: Option<u32>,
    pub published: Option<NaiveDate>,
    pub venue: Option<String>,
    pub source: SourceKind,
}

// --- Canonical identity ---

/// Normalized identity string used for permanent deduplication.
/// Two records describing the same work must map to the same key no matter
/// which source produced them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// --- Relevance tier ---

/// Ordered relevance classification. `Primary` outranks `Secondary`;
/// records matching neither are dropped before a `Tier` is ever assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Secondary,
    Primary,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Primary => write!(f, "PRIMARY"),
            Tier::Secondary => write!(f, "SECONDARY"),
        }
    }
}

// --- Classified output ---

/// A record that survived dedup and classification.
///
/// The serialized shape of this struct is the durable archive format and the
/// sole contract with the dashboard renderer. Renaming or removing a field
/// here is a breaking change for that consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedItem {
    pub key: CanonicalKey,
    pub title: String,
    pub source: SourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default)]
    pub published: Option<NaiveDate>,
    pub tier: Tier,
    pub score: u32,
}

impl ClassifiedItem {
    /// Archive merge identity: (title, publication date), not the
    /// CanonicalKey. The same work can be re-observed under a different
    /// identifier and must not duplicate the ledger.
    pub fn merge_key(&self) -> (&str, Option<NaiveDate>) {
        (self.title.as_str(), self.published)
    }
}
