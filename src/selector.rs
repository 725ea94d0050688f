//! Stable selector generation
//!
//! Produces either `tag[attr='value']` from the first usable stable attribute, or
//! `tag.class1.class2` from the element's non-generated classes.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::Element;
use crate::scorer::STABLE_ATTRIBUTES;

// Values safe to embed in an attribute selector without quoting issues
static IDENTIFIER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9\-_.]*$").expect("Invalid identifier regex pattern")
});

/// Builds selectors, skipping classes that start with a blocklisted prefix
#[derive(Debug, Clone)]
pub struct SelectorGenerator {
    class_blocklist: Vec<String>,
}

impl SelectorGenerator {
    pub fn new(class_blocklist: Vec<String>) -> Self {
        Self { class_blocklist }
    }

    /// Selector for an element, or `None` if it has nothing stable to offer
    pub fn selector<E: Element + ?Sized>(&self, element: &E) -> Option<String> {
        self.attribute_selector(element)
            .or_else(|| self.class_selector(element))
    }

    /// `tag[attr='value']` for the first stable attribute with an identifier-like value
    fn attribute_selector<E: Element + ?Sized>(&self, element: &E) -> Option<String> {
        STABLE_ATTRIBUTES.iter().find_map(|attr| {
            let value = element.attr(attr)?;
            let value = value.as_single()?;
            if is_identifier(value) {
                Some(format!("{}[{}='{}']", element.tag(), attr, value))
            } else {
                None
            }
        })
    }

    /// `tag.a.b` from sorted, non-blocklisted classes
    fn class_selector<E: Element + ?Sized>(&self, element: &E) -> Option<String> {
        let classes = element.attr("class")?;
        let mut kept: Vec<&str> = classes
            .tokens()
            .into_iter()
            .filter(|class| !self.is_blocklisted(class))
            .collect();

        if kept.is_empty() {
            return None;
        }
        kept.sort_unstable();
        Some(format!("{}.{}", element.tag(), kept.join(".")))
    }

    fn is_blocklisted(&self, class: &str) -> bool {
        self.class_blocklist
            .iter()
            .any(|prefix| class.starts_with(prefix.as_str()))
    }
}

impl Default for SelectorGenerator {
    fn default() -> Self {
        Self::new(vec!["ltr-".to_string(), "s-".to_string()])
    }
}

/// Starts with a letter, then only letters, digits, `-`, `_` or `.`
pub fn is_identifier(value: &str) -> bool {
    IDENTIFIER_RE.is_match(value)
}
