//! Document - parsed markup and the element view the ranker consumes
//!
//! Parsing is delegated to `scraper` (html5ever). Everything downstream talks to
//! the [`Element`] trait, so the scorer and selector generator never touch parser
//! internals and can be exercised with hand-built [`OwnedElement`]s.

use scraper::{ElementRef, Html, Node};
use std::borrow::Cow;

use crate::error::{RankError, Result};

/// Attributes that hold a whitespace-separated list of tokens
const MULTI_VALUED_ATTRIBUTES: &[&str] = &[
    "class",
    "rel",
    "rev",
    "accept-charset",
    "headers",
    "accesskey",
    "dropzone",
];

/// Elements whose text is never part of their parent's visible text
const HIDDEN_TEXT_TAGS: &[&str] = &["script", "style", "template"];

/// An attribute value, either a plain string or a token list (e.g. `class`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Single(String),
    Multi(Vec<String>),
}

impl AttrValue {
    /// Build the value the way the attribute is declared in HTML
    pub fn from_raw(name: &str, raw: &str) -> Self {
        if MULTI_VALUED_ATTRIBUTES.contains(&name) {
            AttrValue::Multi(raw.split_ascii_whitespace().map(String::from).collect())
        } else {
            AttrValue::Single(raw.to_string())
        }
    }

    /// Single text form: token lists are joined with spaces
    pub fn joined(&self) -> Cow<'_, str> {
        match self {
            AttrValue::Single(s) => Cow::Borrowed(s.as_str()),
            AttrValue::Multi(tokens) => Cow::Owned(tokens.join(" ")),
        }
    }

    /// The value if it is a plain string
    pub fn as_single(&self) -> Option<&str> {
        match self {
            AttrValue::Single(s) => Some(s),
            AttrValue::Multi(_) => None,
        }
    }

    /// Tokens of the value; a plain string is a single token
    pub fn tokens(&self) -> Vec<&str> {
        match self {
            AttrValue::Single(s) => vec![s.as_str()],
            AttrValue::Multi(tokens) => tokens.iter().map(String::as_str).collect(),
        }
    }
}

/// Read-only view of one node in a document tree
pub trait Element {
    /// Lowercase tag name
    fn tag(&self) -> &str;

    /// All attributes in document order
    fn attributes(&self) -> Vec<(String, AttrValue)>;

    /// A single attribute by name
    fn attr(&self, name: &str) -> Option<AttrValue>;

    /// Visible descendant text: trimmed text nodes joined with single spaces
    fn text(&self) -> String;
}

/// An element of a parsed [`Document`]
#[derive(Debug, Clone, Copy)]
pub struct PageElement<'a>(ElementRef<'a>);

impl<'a> PageElement<'a> {
    /// The underlying parser node
    pub fn node(&self) -> ElementRef<'a> {
        self.0
    }
}

impl<'a> Element for PageElement<'a> {
    fn tag(&self) -> &str {
        self.0.value().name()
    }

    fn attributes(&self) -> Vec<(String, AttrValue)> {
        self.0
            .value()
            .attrs()
            .map(|(name, raw)| (name.to_string(), AttrValue::from_raw(name, raw)))
            .collect()
    }

    fn attr(&self, name: &str) -> Option<AttrValue> {
        self.0
            .value()
            .attr(name)
            .map(|raw| AttrValue::from_raw(name, raw))
    }

    fn text(&self) -> String {
        let mut parts = Vec::new();
        collect_visible_text(self.0, &mut parts);
        parts.join(" ")
    }
}

/// Gather trimmed, non-empty text nodes, skipping script/style/template children
fn collect_visible_text<'a>(element: ElementRef<'a>, parts: &mut Vec<&'a str>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    parts.push(trimmed);
                }
            }
            Node::Element(el) => {
                if HIDDEN_TEXT_TAGS.contains(&el.name()) {
                    continue;
                }
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_visible_text(child_ref, parts);
                }
            }
            _ => {}
        }
    }
}

/// An element that owns its data, for callers with their own tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OwnedElement {
    pub tag: String,
    pub attributes: Vec<(String, AttrValue)>,
    pub text: String,
}

impl OwnedElement {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_lowercase(),
            ..Default::default()
        }
    }

    /// Add an attribute, splitting token-list attributes like `class`
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes
            .push((name.to_string(), AttrValue::from_raw(name, value)));
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }
}

impl Element for OwnedElement {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn attributes(&self) -> Vec<(String, AttrValue)> {
        self.attributes.clone()
    }

    fn attr(&self, name: &str) -> Option<AttrValue> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    fn text(&self) -> String {
        self.text.trim().to_string()
    }
}

/// A parsed HTML document
pub struct Document {
    html: Html,
}

impl Document {
    /// Parse markup into a document tree
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// Parse raw bytes, failing before any parsing if they are not UTF-8 text
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let markup = std::str::from_utf8(bytes).map_err(|e| {
            RankError::InvalidInput(format!("document is not valid UTF-8 text: {}", e))
        })?;
        Ok(Self::parse(markup))
    }

    /// Every element in depth-first document order, starting at `<html>`
    pub fn elements(&self) -> impl Iterator<Item = PageElement<'_>> {
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .map(PageElement)
    }

    /// Every `<script type="application/ld+json">` element
    pub fn json_ld_scripts(&self) -> impl Iterator<Item = PageElement<'_>> {
        self.elements().filter(|el| is_json_ld_script(el))
    }
}

/// True for `<script type="application/ld+json">` (exact type match)
pub fn is_json_ld_script<E: Element + ?Sized>(element: &E) -> bool {
    element.tag() == "script"
        && element
            .attr("type")
            .map(|t| t.as_single() == Some("application/ld+json"))
            .unwrap_or(false)
}
