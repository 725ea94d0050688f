//! Ranking pipeline
//!
//! learn JSON-LD vocabulary → score every element → keep those above the
//! confidence threshold → group by selector → boost repeated selectors → sort.

use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::config::Config;
use crate::document::{Document, Element};
use crate::error::Result;
use crate::keywords::{KeywordTable, Vocabulary};
use crate::learner::{JsonLdLearner, LearnReport};
use crate::scorer::{ElementScorer, ScoreBreakdown};
use crate::selector::SelectorGenerator;

/// Running totals for one selector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateEntry {
    pub score: f64,
    pub count: u32,
}

/// One line of the final ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub selector: String,
    pub final_score: f64,
    pub total_base_score: f64,
    pub count: u32,
}

/// Per-selector score totals, kept in discovery order
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    entries: Vec<(String, AggregateEntry)>,
    index: HashMap<String, usize>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one qualifying element
    pub fn add(&mut self, selector: &str, score: f64) {
        self.add_entry(selector, AggregateEntry { score, count: 1 });
    }

    fn add_entry(&mut self, selector: &str, entry: AggregateEntry) {
        match self.index.get(selector) {
            Some(&i) => {
                let existing = &mut self.entries[i].1;
                existing.score += entry.score;
                existing.count += entry.count;
            }
            None => {
                self.index.insert(selector.to_string(), self.entries.len());
                self.entries.push((selector.to_string(), entry));
            }
        }
    }

    /// Fold another aggregator into this one.
    ///
    /// Scores and counts are summed per selector; selectors unseen here are
    /// appended in the other aggregator's order.
    pub fn merge(&mut self, other: Aggregator) {
        for (selector, entry) in other.entries {
            self.add_entry(&selector, entry);
        }
    }

    pub fn get(&self, selector: &str) -> Option<&AggregateEntry> {
        self.index.get(selector).map(|&i| &self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply the repetition boost and sort by final score, best first.
    /// Ties keep discovery order.
    pub fn into_ranking(self) -> Vec<RankedResult> {
        let mut ranked: Vec<RankedResult> = self
            .entries
            .into_iter()
            .map(|(selector, entry)| RankedResult {
                selector,
                final_score: round2(boosted_score(entry.score, entry.count)),
                total_base_score: round2(entry.score),
                count: entry.count,
            })
            .collect();

        // sort_by is stable
        ranked.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
        ranked
    }
}

/// `base × (1 + log10(count))`; never below `base` for count ≥ 1
pub fn boosted_score(base: f64, count: u32) -> f64 {
    if count == 0 {
        return base;
    }
    base * (1.0 + f64::from(count).log10())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One element behind a selector, for diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct ScoredElement {
    pub tag: String,
    pub selector: String,
    pub breakdown: ScoreBreakdown,
    /// Scored above the confidence threshold, so it counts toward the ranking
    pub qualified: bool,
}

/// Vocabulary in effect after learning
pub struct LearnedVocabulary {
    pub vocabulary: Vocabulary,
    pub report: LearnReport,
}

/// Ranks selectors on HTML pages
#[derive(Debug, Clone)]
pub struct AssetRanker {
    config: Config,
    base_keywords: KeywordTable,
    selectors: SelectorGenerator,
}

impl AssetRanker {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let base_keywords = KeywordTable::from_config(&config)?;
        let selectors = SelectorGenerator::new(config.class_blocklist.clone());
        Ok(Self {
            config,
            base_keywords,
            selectors,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Rank raw document bytes; non-UTF-8 input is rejected before parsing
    pub fn rank_bytes(&self, bytes: &[u8]) -> Result<Vec<RankedResult>> {
        let document = Document::from_bytes(bytes)?;
        Ok(self.rank_document(&document))
    }

    pub fn rank_html(&self, html: &str) -> Vec<RankedResult> {
        self.rank_document(&Document::parse(html))
    }

    /// Full pipeline over a parsed document
    pub fn rank_document(&self, document: &Document) -> Vec<RankedResult> {
        let vocabulary = self.learn(document).vocabulary;
        let aggregator = self.aggregate(document, &vocabulary);
        let ranked = aggregator.into_ranking();
        debug!(selectors = ranked.len(), "ranked selectors");
        ranked
    }

    /// Extend a fresh copy of the configured keywords from the page's JSON-LD
    /// and freeze it. The ranker's own table is never modified.
    pub fn learn(&self, document: &Document) -> LearnedVocabulary {
        let mut table = self.base_keywords.clone();
        let report = JsonLdLearner::from_config(&self.config).learn_with_report(document, &mut table);
        LearnedVocabulary {
            vocabulary: table.freeze(),
            report,
        }
    }

    /// Score every element and total the ones above the threshold per selector
    pub fn aggregate(&self, document: &Document, vocabulary: &Vocabulary) -> Aggregator {
        let scorer = ElementScorer::new(vocabulary);
        let mut aggregator = Aggregator::new();
        let mut qualifying = 0usize;

        for element in document.elements() {
            let score = scorer.score(&element);
            if score <= self.config.confidence_threshold {
                continue;
            }
            qualifying += 1;
            if let Some(selector) = self.selectors.selector(&element) {
                aggregator.add(&selector, score);
            }
        }

        debug!(
            qualifying,
            selectors = aggregator.len(),
            "aggregated elements above threshold"
        );
        aggregator
    }

    /// Breakdown for every element whose selector is `selector`, in document
    /// order. Elements at or below the threshold are included, marked unqualified.
    pub fn explain(&self, document: &Document, selector: &str) -> Vec<ScoredElement> {
        let vocabulary = self.learn(document).vocabulary;
        let scorer = ElementScorer::new(&vocabulary);

        document
            .elements()
            .filter(|element| self.selectors.selector(element).as_deref() == Some(selector))
            .map(|element| {
                let breakdown = scorer.breakdown(&element);
                ScoredElement {
                    tag: element.tag().to_string(),
                    selector: selector.to_string(),
                    qualified: breakdown.total() > self.config.confidence_threshold,
                    breakdown,
                }
            })
            .collect()
    }
}

impl Default for AssetRanker {
    fn default() -> Self {
        let config = Config::default();
        Self {
            base_keywords: KeywordTable::seeded(),
            selectors: SelectorGenerator::new(config.class_blocklist.clone()),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boost_arithmetic() {
        let mut agg = Aggregator::new();
        for _ in 0..10 {
            agg.add("div.card", 20.0);
        }

        let ranked = agg.into_ranking();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].total_base_score, 200.0);
        assert_eq!(ranked[0].count, 10);
        assert_eq!(ranked[0].final_score, 400.0);
    }

    #[test]
    fn test_single_occurrence_has_no_boost() {
        assert_eq!(boosted_score(37.5, 1), 37.5);
        assert!(boosted_score(10.0, 2) > 10.0);
    }

    #[test]
    fn test_ties_keep_discovery_order() {
        let mut agg = Aggregator::new();
        agg.add("b.second", 30.0);
        agg.add("a.first", 30.0);
        agg.add("c.best", 90.0);

        let selectors: Vec<String> = agg.into_ranking().into_iter().map(|r| r.selector).collect();
        assert_eq!(selectors, vec!["c.best", "b.second", "a.first"]);
    }

    #[test]
    fn test_merge_is_order_independent() {
        let mut left = Aggregator::new();
        left.add("div.a", 20.0);
        left.add("div.b", 16.0);

        let mut right = Aggregator::new();
        right.add("div.b", 30.0);
        right.add("div.c", 18.0);

        let mut lr = left.clone();
        lr.merge(right.clone());
        let mut rl = right;
        rl.merge(left);

        for selector in ["div.a", "div.b", "div.c"] {
            assert_eq!(lr.get(selector), rl.get(selector));
        }
        assert_eq!(
            lr.get("div.b"),
            Some(&AggregateEntry { score: 46.0, count: 2 })
        );
    }

    #[test]
    fn test_rounding() {
        let mut agg = Aggregator::new();
        agg.add("span.price", 16.333);
        agg.add("span.price", 16.333);

        let ranked = agg.into_ranking();
        assert_eq!(ranked[0].total_base_score, 32.67);
        // 32.666 * (1 + log10(2)) = 42.4992...
        assert_eq!(ranked[0].final_score, 42.5);
    }

    #[test]
    fn test_threshold_is_strict() {
        let ranker = AssetRanker::default();

        // "product" alone scores exactly 15
        let ranked = ranker.rank_html(r#"<span class="product"></span>"#);
        assert!(ranked.is_empty());

        // "product" + "item" = 30
        let ranked = ranker.rank_html(r#"<span class="product item"></span>"#);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].selector, "span.item.product");

        let config = Config {
            confidence_threshold: 20.0,
            ..Default::default()
        };
        let ranker = AssetRanker::new(config).unwrap();
        let ranked = ranker.rank_html(r#"<span class="price"></span>"#);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_explain_includes_elements_below_threshold() {
        let ranker = AssetRanker::default();
        let doc = Document::parse(
            r#"<span class="product">Shoe</span><span class="product">€20</span><p class="product"></p>"#,
        );

        let explained = ranker.explain(&doc, "span.product");

        assert_eq!(explained.len(), 2);
        assert_eq!(explained[0].breakdown.total(), 15.0);
        assert!(!explained[0].qualified);
        assert_eq!(explained[1].breakdown.total(), 40.0);
        assert!(explained[1].qualified);
        assert!(ranker.explain(&doc, "div.product").is_empty());
    }

    #[test]
    fn test_ranker_does_not_keep_learned_keywords() {
        let ranker = AssetRanker::default();
        let page = r#"<script type="application/ld+json">{"gtin": "1"}</script>"#;

        let learned = ranker.learn(&Document::parse(page));
        assert_eq!(learned.vocabulary.get("gtin"), Some(10.0));
        assert!(!ranker.base_keywords.contains("gtin"));
    }
}
