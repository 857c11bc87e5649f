// Relevance classification.
//
// Keyword matching is word-boundary and case-insensitive: "ai" must match
// "AI for batteries" but never "again". Patterns are compiled once at
// construction; a taxonomy that constructs a Classifier is guaranteed
// matchable for the rest of the run.

use anyhow::{Context, Result};
use regex::Regex;

use litscout_common::{ClassifierConfig, ClassifierMode, KeywordTaxonomy, Tier};

pub struct Classifier {
    subject: Vec<Regex>,
    method: Vec<Regex>,
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(taxonomy: &KeywordTaxonomy, config: ClassifierConfig) -> Result<Self> {
        Ok(Self {
            subject: compile_all(taxonomy.subject_keywords())?,
            method: compile_all(taxonomy.method_keywords())?,
            config,
        })
    }

    /// Score a record and assign a tier, or `None` when it should be
    /// dropped. An absent abstract only forfeits abstract-based score.
    pub fn classify(
        &self,
        title: &str,
        abstract_text: Option<&str>,
        citation_count: Option<u32>,
    ) -> Option<(Tier, u32)> {
        let abstract_text = abstract_text.unwrap_or("");

        let (subject_hit, subject_score) = self.match_axis(&self.subject, title, abstract_text);
        let (method_hit, method_score) = self.match_axis(&self.method, title, abstract_text);

        let mut score = subject_score + method_score;
        if citation_count.unwrap_or(0) > self.config.citation_threshold {
            score += self.config.citation_bonus;
        }

        let tier = match self.config.mode {
            ClassifierMode::SubjectAndMethod => {
                if subject_hit && method_hit {
                    Tier::Primary
                } else if subject_hit {
                    Tier::Secondary
                } else {
                    return None;
                }
            }
            ClassifierMode::Threshold => {
                if score >= self.config.primary_threshold {
                    Tier::Primary
                } else if score >= self.config.secondary_threshold {
                    Tier::Secondary
                } else {
                    return None;
                }
            }
        };

        Some((tier, score))
    }

    /// Per keyword: a title hit scores `title_weight`, an abstract-only hit
    /// scores `abstract_weight`; a keyword never scores twice.
    fn match_axis(&self, patterns: &[Regex], title: &str, abstract_text: &str) -> (bool, u32) {
        let mut hit = false;
        let mut score = 0;
        for re in patterns {
            if re.is_match(title) {
                hit = true;
                score += self.config.title_weight;
            } else if re.is_match(abstract_text) {
                hit = true;
                score += self.config.abstract_weight;
            }
        }
        (hit, score)
    }
}

fn compile_all<'a>(keywords: impl Iterator<Item = &'a str>) -> Result<Vec<Regex>> {
    keywords.map(compile_keyword).collect()
}

fn compile_keyword(keyword: &str) -> Result<Regex> {
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(keyword)))
        .with_context(|| format!("Failed to compile keyword pattern for {keyword:?}"))
}
