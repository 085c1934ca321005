// Attribute-selector subset for locating host-page controls
//
// Host pages identify their controls through attributes, not stable
// ids, so the engine matches against a small parsed subset of CSS
// selector syntax: `tag`, `[attr]`, `[attr="v"]`, `[attr*="v"]`, and
// tag-plus-attribute combinations. The list of selectors in use is
// injected data; swapping it must never require code changes.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use smallvec::SmallVec;

use super::node::NodeId;
use super::page::Page;

static SELECTOR_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z][a-zA-Z0-9-]*)?((?:\[[^\]]+\])*)$").unwrap()
});

static ATTR_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*([a-zA-Z_][a-zA-Z0-9_-]*)\s*(?:(\*?=)\s*(?:"([^"]*)"|'([^']*)')\s*)?$"#)
        .unwrap()
});

/// How one attribute clause matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals,
    Contains,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrMatcher {
    name: String,
    op: AttrOp,
    value: String,
}

impl AttrMatcher {
    fn matches(&self, attr_value: Option<&str>) -> bool {
        match (self.op, attr_value) {
            (AttrOp::Exists, found) => found.is_some(),
            (AttrOp::Equals, Some(found)) => found == self.value,
            (AttrOp::Contains, Some(found)) => found.contains(&self.value),
            (_, None) => false,
        }
    }
}

/// Error for selector strings outside the supported subset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorParseError {
    #[error("empty selector")]
    Empty,

    #[error("unsupported selector syntax: {0}")]
    Unsupported(String),

    #[error("malformed attribute clause: [{0}]")]
    MalformedAttribute(String),
}

/// A parsed selector, matchable against arena nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    tag: Option<String>,
    attrs: SmallVec<[AttrMatcher; 2]>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(SelectorParseError::Empty);
        }

        let shape = SELECTOR_SHAPE
            .captures(trimmed)
            .ok_or_else(|| SelectorParseError::Unsupported(trimmed.to_string()))?;

        let tag = shape
            .get(1)
            .map(|m| m.as_str().to_ascii_lowercase())
            .filter(|t| !t.is_empty());

        let mut attrs = SmallVec::new();
        let clauses = shape.get(2).map(|m| m.as_str()).unwrap_or("");
        for clause in clauses
            .split_terminator(']')
            .map(|c| c.trim_start_matches('['))
            .filter(|c| !c.is_empty())
        {
            let caps = ATTR_CLAUSE
                .captures(clause)
                .ok_or_else(|| SelectorParseError::MalformedAttribute(clause.to_string()))?;
            let name = caps[1].to_string();
            let (op, value) = match caps.get(2).map(|m| m.as_str()) {
                None => (AttrOp::Exists, String::new()),
                Some("=") => (AttrOp::Equals, quoted_value(&caps)),
                Some("*=") => (AttrOp::Contains, quoted_value(&caps)),
                Some(other) => {
                    return Err(SelectorParseError::Unsupported(other.to_string()));
                }
            };
            attrs.push(AttrMatcher { name, op, value });
        }

        if tag.is_none() && attrs.is_empty() {
            return Err(SelectorParseError::Unsupported(trimmed.to_string()));
        }

        Ok(Self {
            source: trimmed.to_string(),
            tag,
            attrs,
        })
    }

    /// Parses a priority-ordered selector list, failing on the first
    /// bad entry.
    pub fn parse_list(inputs: &[&str]) -> Result<Vec<Selector>, SelectorParseError> {
        inputs.iter().map(|s| Selector::parse(s)).collect()
    }

    pub fn matches(&self, page: &Page, node: NodeId) -> bool {
        let node = page.node(node);
        if let Some(tag) = &self.tag {
            if node.tag() != tag {
                return false;
            }
        }
        self.attrs
            .iter()
            .all(|matcher| matcher.matches(node.attr(&matcher.name)))
    }

    /// The original selector text, for logs and diagnostics.
    pub fn source(&self) -> &str {
        &self.source
    }
}

fn quoted_value(caps: &regex::Captures<'_>) -> String {
    caps.get(3)
        .or_else(|| caps.get(4))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

impl FromStr for Selector {
    type Err = SelectorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}
