//! JSON-LD vocabulary learner
//!
//! Pages that embed schema.org data name their own fields (`gtin13`, `offers`,
//! `priceCurrency`, ...). Those key names are added to the keyword table before
//! scoring so the page's own vocabulary counts as a relevance signal.

use serde_json::Value;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::document::{Document, Element};
use crate::keywords::KeywordTable;

/// Outcome of one learning pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LearnReport {
    /// Distinct normalized keys found across all scripts
    pub discovered: usize,
    /// Keys that were new to the table
    pub inserted: usize,
    /// Scripts that were empty, too large, or not valid JSON
    pub skipped_scripts: usize,
    /// New keys left out because the learned keyword limit was reached
    pub dropped: usize,
}

/// Collects JSON-LD keys and extends a keyword table with them
#[derive(Debug, Clone)]
pub struct JsonLdLearner {
    default_weight: f64,
    max_bytes: usize,
    max_depth: usize,
    max_keywords: usize,
}

impl JsonLdLearner {
    pub fn new(default_weight: f64, max_bytes: usize, max_depth: usize) -> Self {
        Self {
            default_weight,
            max_bytes,
            max_depth,
            max_keywords: usize::MAX,
        }
    }

    /// Insert at most `max_keywords` new keywords per learning pass
    pub fn with_max_keywords(mut self, max_keywords: usize) -> Self {
        self.max_keywords = max_keywords;
        self
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.learned_keyword_weight,
            config.max_json_ld_bytes,
            config.max_json_ld_depth,
        )
        .with_max_keywords(config.max_learned_keywords)
    }

    /// Learn from every JSON-LD script in the document.
    /// Returns the number of distinct keys discovered.
    pub fn learn(&self, document: &Document, table: &mut KeywordTable) -> usize {
        self.learn_with_report(document, table).discovered
    }

    /// Same as [`learn`](Self::learn) but with the full diagnostic report
    pub fn learn_with_report(&self, document: &Document, table: &mut KeywordTable) -> LearnReport {
        let bodies: Vec<String> = document.json_ld_scripts().map(|s| s.text()).collect();
        self.learn_from_bodies(bodies.iter().map(String::as_str), table)
    }

    /// Learn from raw script bodies
    pub fn learn_from_bodies<'a, I>(&self, bodies: I, table: &mut KeywordTable) -> LearnReport
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut keys = BTreeSet::new();
        let mut skipped_scripts = 0;

        for (i, body) in bodies.into_iter().enumerate() {
            match self.parse_body(body) {
                Some(json) => self.collect_keys(&json, 0, &mut keys),
                None => {
                    debug!(script = i, bytes = body.len(), "skipping unusable JSON-LD script");
                    skipped_scripts += 1;
                }
            }
        }

        // BTreeSet iteration keeps insertion order stable across runs
        let mut inserted = 0;
        let mut dropped = 0;
        for key in &keys {
            if table.contains(key) {
                continue;
            }
            if inserted >= self.max_keywords {
                dropped += 1;
            } else if table.learn(key, self.default_weight) {
                inserted += 1;
            }
        }

        if dropped > 0 {
            warn!(
                dropped,
                limit = self.max_keywords,
                "JSON-LD declares more keys than the learned keyword limit"
            );
        }
        info!(
            discovered = keys.len(),
            inserted, skipped_scripts, "learned keywords from JSON-LD"
        );

        LearnReport {
            discovered: keys.len(),
            inserted,
            skipped_scripts,
            dropped,
        }
    }

    fn parse_body(&self, body: &str) -> Option<Value> {
        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed.len() > self.max_bytes {
            return None;
        }
        serde_json::from_str::<Value>(trimmed).ok()
    }

    /// Walk objects and arrays, collecting normalized key names.
    /// Nothing below `max_depth` levels of nesting is visited.
    fn collect_keys(&self, json: &Value, depth: usize, keys: &mut BTreeSet<String>) {
        if depth >= self.max_depth {
            return;
        }
        match json {
            Value::Object(map) => {
                for (key, value) in map {
                    let normalized = normalize_key(key);
                    if !normalized.is_empty() {
                        keys.insert(normalized);
                    }
                    self.collect_keys(value, depth + 1, keys);
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.collect_keys(item, depth + 1, keys);
                }
            }
            _ => {}
        }
    }
}

impl Default for JsonLdLearner {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Lowercase and keep only the letters a-z: `@type` → `type`, `gtin13` → `gtin`
pub fn normalize_key(key: &str) -> String {
    key.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase())
        .collect()
}
