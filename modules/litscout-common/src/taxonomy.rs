use std::collections::{BTreeMap, BTreeSet};

use crate::error::LitScoutError;

/// Immutable keyword taxonomy: domain name -> ordered keyword list, with a
/// subset of domains designated as "method" axes (e.g. AI techniques) as
/// opposed to "subject" axes (e.g. materials).
///
/// Constructed once at process start and passed by reference into every
/// component that needs it. Validation happens here, not in the classifier:
/// a taxonomy that loads is a taxonomy that can be matched against.
#[derive(Debug, Clone)]
pub struct KeywordTaxonomy {
    domains: BTreeMap<String, Vec<String>>,
    method_domains: BTreeSet<String>,
}

impl KeywordTaxonomy {
    pub fn new(
        domains: BTreeMap<String, Vec<String>>,
        method_domains: Vec<String>,
    ) -> Result<Self, LitScoutError> {
        if domains.is_empty() {
            return Err(LitScoutError::Taxonomy(
                "taxonomy must define at least one domain".into(),
            ));
        }
        for (name, keywords) in &domains {
            if keywords.is_empty() {
                return Err(LitScoutError::Taxonomy(format!(
                    "domain '{name}' has no keywords"
                )));
            }
            if let Some(kw) = keywords.iter().find(|k| k.trim().is_empty()) {
                return Err(LitScoutError::Taxonomy(format!(
                    "domain '{name}' contains an empty keyword ({kw:?})"
                )));
            }
        }
        let method_domains: BTreeSet<String> = method_domains.into_iter().collect();
        for name in &method_domains {
            if !domains.contains_key(name) {
                return Err(LitScoutError::Taxonomy(format!(
                    "method domain '{name}' is not a defined domain"
                )));
            }
        }
        Ok(Self {
            domains,
            method_domains,
        })
    }

    pub fn domain_count(&self) -> usize {
        self.domains.len()
    }

    pub fn is_method_domain(&self, name: &str) -> bool {
        self.method_domains.contains(name)
    }

    /// All keywords across all domains, in domain order.
    pub fn all_keywords(&self) -> impl Iterator<Item = &str> {
        self.domains.values().flatten().map(String::as_str)
    }

    /// Keywords from subject (non-method) domains.
    pub fn subject_keywords(&self) -> impl Iterator<Item = &str> {
        self.domains
            .iter()
            .filter(|(name, _)| !self.method_domains.contains(*name))
            .flat_map(|(_, kws)| kws.iter().map(String::as_str))
    }

    /// Keywords from method domains.
    pub fn method_keywords(&self) -> impl Iterator<Item = &str> {
        self.domains
            .iter()
            .filter(|(name, _)| self.method_domains.contains(*name))
            .flat_map(|(_, kws)| kws.iter().map(String::as_str))
    }
}
