//! Keyword weight table
//!
//! A [`KeywordTable`] is built from the seed vocabulary, extended once by the
//! JSON-LD learner, and then frozen into a [`Vocabulary`]. Scoring only ever
//! sees the frozen form.
//!
//! Keywords are single words. Whole-word matching splits the text into words
//! once and looks each word up, so the cost does not grow with the vocabulary.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

use crate::config::Config;
use crate::error::{RankError, Result};

/// Hand-tuned e-commerce vocabulary
pub const SEED_KEYWORDS: &[(&str, f64)] = &[
    ("sku", 25.0),
    ("productid", 25.0),
    ("price", 20.0),
    ("pricing", 20.0),
    ("sale", 18.0),
    ("discount", 18.0),
    ("inventory", 20.0),
    ("stock", 20.0),
    ("availability", 18.0),
    ("productcard", 20.0),
    ("product", 15.0),
    ("item", 15.0),
    ("brand", 12.0),
    ("designer", 12.0),
    ("vendor", 10.0),
    ("name", 10.0),
    ("title", 10.0),
    ("details", 8.0),
    ("info", 8.0),
    ("description", 8.0),
    ("size", 10.0),
    ("color", 8.0),
    ("variant", 10.0),
    ("cart", 15.0),
    ("bag", 15.0),
    ("checkout", 15.0),
    ("purchase", 15.0),
    ("add", 12.0),
    ("buy", 12.0),
    ("list", 8.0),
    ("grid", 8.0),
    ("gallery", 7.0),
    ("image", 7.0),
    ("main", 5.0),
];

// Same notion of "word" as a `\b...\b` match
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("Invalid word regex pattern"));

/// Words of `text` in order, duplicates included
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    WORD_RE.find_iter(text).map(|m| m.as_str())
}

/// True if `keyword` is exactly one word
pub fn is_single_word(keyword: &str) -> bool {
    WORD_RE
        .find(keyword)
        .map(|m| m.start() == 0 && m.end() == keyword.len())
        .unwrap_or(false)
}

/// Mutable keyword → weight mapping, insertion ordered
#[derive(Debug, Clone, Default)]
pub struct KeywordTable {
    entries: Vec<(String, f64)>,
    index: HashMap<String, usize>,
    learned: Vec<String>,
}

impl KeywordTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Table holding the seed vocabulary
    pub fn seeded() -> Self {
        let mut table = Self::new();
        for (keyword, weight) in SEED_KEYWORDS {
            table.insert_if_absent(keyword, *weight);
        }
        table
    }

    /// Seed vocabulary plus the configured extra keywords
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut table = Self::seeded();
        for (keyword, weight) in &config.extra_keywords {
            if !(*weight > 0.0) {
                return Err(RankError::ConfigError(format!(
                    "extra keyword '{}' must have a positive weight, got {}",
                    keyword, weight
                )));
            }
            let keyword = keyword.to_lowercase();
            if !is_single_word(&keyword) {
                return Err(RankError::ConfigError(format!(
                    "extra keyword '{}' must be a single word",
                    keyword
                )));
            }
            table.insert_if_absent(&keyword, *weight);
        }
        Ok(table)
    }

    pub fn get(&self, keyword: &str) -> Option<f64> {
        self.index.get(keyword).map(|&i| self.entries[i].1)
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.index.contains_key(keyword)
    }

    /// Insert a keyword unless it already exists. Returns true if inserted.
    ///
    /// Existing weights are never overwritten.
    pub fn insert_if_absent(&mut self, keyword: &str, weight: f64) -> bool {
        if keyword.is_empty() || self.index.contains_key(keyword) {
            return false;
        }
        self.index.insert(keyword.to_string(), self.entries.len());
        self.entries.push((keyword.to_string(), weight));
        true
    }

    /// Insert a keyword discovered at runtime, remembering that it was learned
    pub fn learn(&mut self, keyword: &str, weight: f64) -> bool {
        let inserted = self.insert_if_absent(keyword, weight);
        if inserted {
            self.learned.push(keyword.to_string());
        }
        inserted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Make the table read-only
    pub fn freeze(self) -> Vocabulary {
        let learned: HashSet<String> = self.learned.into_iter().collect();
        let keywords = self
            .entries
            .into_iter()
            .map(|(word, weight)| Keyword {
                learned: learned.contains(&word),
                word,
                weight,
            })
            .collect();
        Vocabulary {
            keywords,
            index: self.index,
        }
    }
}

/// One frozen keyword
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub word: String,
    pub weight: f64,
    pub learned: bool,
}

impl Keyword {
    /// True if the keyword appears as a whole word (not inside another word)
    pub fn matches_word(&self, text: &str) -> bool {
        words(text).any(|w| w == self.word)
    }

    /// True if the keyword appears anywhere, including inside another word
    pub fn matches_substring(&self, text: &str) -> bool {
        text.contains(self.word.as_str())
    }
}

/// Frozen keyword table used for scoring
#[derive(Debug, Clone)]
pub struct Vocabulary {
    keywords: Vec<Keyword>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    pub fn get(&self, keyword: &str) -> Option<f64> {
        self.index.get(keyword).map(|&i| self.keywords[i].weight)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keyword> {
        self.keywords.iter()
    }

    /// Sum of weights of keywords found as whole words in `text`.
    /// A keyword counts once however often it appears.
    pub fn whole_word_weight(&self, text: &str) -> f64 {
        let mut seen = HashSet::new();
        words(text)
            .filter(|w| seen.insert(*w))
            .filter_map(|w| self.get(w))
            .sum()
    }

    /// Sum of weights of keywords found anywhere in `text`
    pub fn substring_weight(&self, text: &str) -> f64 {
        self.keywords
            .iter()
            .filter(|k| k.matches_substring(text))
            .map(|k| k.weight)
            .sum()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}
