//! Field extraction strategies.
//!
//! A strategy looks at a parsed profile page and either produces the raw
//! string for a field or gives up. [`super::fields`] arranges strategies into
//! per-field priority lists.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};

use super::ProfileDocument;

static LABEL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("dt, th").expect("valid label selector"));

/// Something that can try to produce one field's raw value from a page.
pub trait FieldStrategy: Send + Sync {
    /// Short description used in debug logs.
    fn describe(&self) -> String;

    fn find(&self, doc: &ProfileDocument) -> Option<String>;
}

/// Matches a regular expression against the flattened page text and returns
/// capture group 1.
pub struct RegexStrategy {
    pattern: Regex,
}

impl RegexStrategy {
    /// # Panics
    ///
    /// Panics if `pattern` is not a valid regex. Patterns are compile-time
    /// literals, so this only fires on a programming error.
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("valid field regex"),
        }
    }
}

impl FieldStrategy for RegexStrategy {
    fn describe(&self) -> String {
        format!("regex {}", self.pattern.as_str())
    }

    fn find(&self, doc: &ProfileDocument) -> Option<String> {
        self.pattern
            .captures(doc.text())
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

/// Finds a label cell (`<dt>`/`<th>`) whose text equals one of `labels` and
/// returns the text of the next sibling element (`<dd>`/`<td>`).
///
/// Label comparison is case-insensitive and ignores a trailing colon.
pub struct LabelStrategy {
    labels: &'static [&'static str],
}

impl LabelStrategy {
    #[must_use]
    pub const fn new(labels: &'static [&'static str]) -> Self {
        Self { labels }
    }
}

impl FieldStrategy for LabelStrategy {
    fn describe(&self) -> String {
        format!("label {:?}", self.labels)
    }

    fn find(&self, doc: &ProfileDocument) -> Option<String> {
        doc.html().select(&LABEL_SELECTOR).find_map(|label_el| {
            let label = normalize_label(&label_el.text().collect::<String>());
            if !self.labels.iter().any(|l| *l == label) {
                return None;
            }
            let value_el = label_el.next_siblings().find_map(ElementRef::wrap)?;
            let value = collapse_whitespace(&value_el.text().collect::<Vec<_>>().join(" "));
            (!value.is_empty()).then_some(value)
        })
    }
}

fn normalize_label(raw: &str) -> String {
    collapse_whitespace(raw)
        .trim_end_matches(':')
        .trim()
        .to_lowercase()
}

pub(crate) fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
