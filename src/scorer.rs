//! Element scorer - heuristic "asset value" of a single element
//!
//! The score is the sum of three independent signal groups:
//! attribute keywords, visible text, and structural markers (microdata, JSON-LD).
//! Whole-word matching is used for attributes and text; `itemprop` values use
//! substring matching.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::document::{is_json_ld_script, Element};
use crate::keywords::Vocabulary;

/// Attributes most likely to carry stable, meaningful identifiers.
/// Order matters for selector generation.
pub const STABLE_ATTRIBUTES: &[&str] = &[
    "id",
    "data-testid",
    "data-product-id",
    "data-sku",
    "data-cy",
    "data-test",
    "name",
];

/// Stable attributes count this many times in the attribute blob (2.5, truncated)
const STABLE_ATTRIBUTE_WEIGHT: f64 = 2.5;

const CURRENCY_BONUS: f64 = 25.0;
const CALL_TO_ACTION_BONUS: f64 = 30.0;
const TEXT_KEYWORD_FACTOR: f64 = 0.5;
const ITEMPROP_BONUS: f64 = 20.0;
const ITEMPROP_KEYWORD_FACTOR: f64 = 1.5;
const JSON_LD_BONUS: f64 = 150.0;

const CURRENCY_SYMBOLS: &[char] = &['€', '$', '£'];

const CALL_TO_ACTION_PHRASES: &[&str] = &["add to bag", "add to cart", "buy now", "add to wishlist"];

// Currency codes only count as standalone words ("eur", not "europe")
static CURRENCY_CODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(usd|eur|gbp|myr)\b").expect("Invalid currency code regex pattern")
});

/// Per-group contributions to an element's score
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub attributes: f64,
    pub text: f64,
    pub structure: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.attributes + self.text + self.structure
    }
}

/// Scores elements against a frozen vocabulary
pub struct ElementScorer<'v> {
    vocabulary: &'v Vocabulary,
}

impl<'v> ElementScorer<'v> {
    pub fn new(vocabulary: &'v Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Total score of an element (never negative)
    pub fn score<E: Element + ?Sized>(&self, element: &E) -> f64 {
        self.breakdown(element).total()
    }

    /// Score of an element split by signal group
    pub fn breakdown<E: Element + ?Sized>(&self, element: &E) -> ScoreBreakdown {
        ScoreBreakdown {
            attributes: self.attribute_signal(element),
            text: self.text_signal(&element.text()),
            structure: self.structural_signal(element),
        }
    }

    /// Keywords found as whole words in the attribute blob
    fn attribute_signal<E: Element + ?Sized>(&self, element: &E) -> f64 {
        let blob = attribute_blob(element);
        self.vocabulary.whole_word_weight(&blob)
    }

    /// Currency, call-to-action, and keyword hits in the visible text
    fn text_signal(&self, text: &str) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        let text = text.to_lowercase();
        let mut score = 0.0;

        if text.contains(CURRENCY_SYMBOLS) || CURRENCY_CODE_RE.is_match(&text) {
            score += CURRENCY_BONUS;
        }
        if CALL_TO_ACTION_PHRASES.iter().any(|p| text.contains(p)) {
            score += CALL_TO_ACTION_BONUS;
        }
        score + self.vocabulary.whole_word_weight(&text) * TEXT_KEYWORD_FACTOR
    }

    /// Microdata and JSON-LD markers
    fn structural_signal<E: Element + ?Sized>(&self, element: &E) -> f64 {
        let mut score = 0.0;

        if let Some(itemprop) = element.attr("itemprop") {
            score += ITEMPROP_BONUS;
            let value = itemprop.joined().to_lowercase();
            score += self.vocabulary.substring_weight(&value) * ITEMPROP_KEYWORD_FACTOR;
        }

        if is_json_ld_script(element) {
            score += JSON_LD_BONUS;
        }
        score
    }
}

/// Lowercase text built from attribute names and values.
///
/// Names have `-` turned into spaces, values have `-` and `_` turned into
/// spaces. Stable attributes are repeated so they dominate the blob.
pub fn attribute_blob<E: Element + ?Sized>(element: &E) -> String {
    let mut blob = String::new();

    for (name, value) in element.attributes() {
        let piece = format!(
            " {} {}",
            name.replace('-', " "),
            value.joined().replace(['-', '_'], " ")
        );
        let repeat = if STABLE_ATTRIBUTES.contains(&name.as_str()) {
            STABLE_ATTRIBUTE_WEIGHT as usize
        } else {
            1
        };
        blob.push_str(&piece.repeat(repeat));
    }
    blob.to_lowercase()
}
