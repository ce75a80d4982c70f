//! Profile page extraction.
//!
//! The page is parsed once into a [`ProfileDocument`] (DOM plus flattened
//! text). Each field then runs its [`fields::FieldChain`] and is converted to
//! its typed value. Every field carries its own `Result`, so the pipeline can
//! decide on fallbacks in one place.

mod fields;
mod strategy;

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

use crate::error::ExtractError;
use crate::parse_helpers::{first_grouped_int, parse_decimal, parse_grouped_int};

pub use fields::{Field, FieldChain};
pub use strategy::{FieldStrategy, LabelStrategy, RegexStrategy};

use fields::PROFILE_FIELDS;
use strategy::collapse_whitespace;

static TRAILING_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*,?\s*\d{1,2}:\d{2}(?:\s*[ap]m)?\s*$").expect("valid trailing time regex")
});

/// A parsed profile page.
///
/// Holds a `scraper::Html`, which is not `Send`; build and drop it inside
/// synchronous code.
pub struct ProfileDocument {
    html: Html,
    text: String,
}

impl ProfileDocument {
    #[must_use]
    pub fn parse(markup: &str) -> Self {
        let html = Html::parse_document(markup);
        let text = flatten_text(&html);
        Self { html, text }
    }

    /// Visible page text with whitespace collapsed to single spaces.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn html(&self) -> &Html {
        &self.html
    }
}

/// Concatenates every text node outside `<script>`/`<style>`, separated by
/// single spaces.
fn flatten_text(html: &Html) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for node in html.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|p| p.value().as_element())
            .is_some_and(|el| matches!(el.name(), "script" | "style" | "noscript"));
        if !hidden {
            parts.push(&text.text);
        }
    }
    collapse_whitespace(&parts.join(" "))
}

/// Typed result of running every field chain over one page.
#[derive(Debug, Clone, PartialEq)]
pub struct RawProfile {
    pub total_posts: Result<u64, ExtractError>,
    pub joined_date: Result<String, ExtractError>,
    pub last_active: Result<String, ExtractError>,
    pub posts_per_day: Result<f64, ExtractError>,
    pub percentage_of_all_posts: Result<f64, ExtractError>,
    pub has_thanked: Result<u64, ExtractError>,
    pub been_thanked: Result<u64, ExtractError>,
}

/// Runs every field chain against `markup`.
#[must_use]
pub fn extract_profile(markup: &str) -> RawProfile {
    let doc = ProfileDocument::parse(markup);
    let raw = |field: Field| -> Result<String, ExtractError> {
        PROFILE_FIELDS
            .iter()
            .find(|chain| chain.field() == field)
            .map_or(
                Err(ExtractError::Missing {
                    field: field.name(),
                }),
                |chain| chain.run(&doc),
            )
    };

    RawProfile {
        total_posts: raw(Field::TotalPosts).and_then(|v| to_count(Field::TotalPosts, v)),
        joined_date: raw(Field::JoinedDate).map(|v| date_part(&v)),
        last_active: raw(Field::LastActive),
        posts_per_day: raw(Field::PostsPerDay).and_then(|v| to_decimal(Field::PostsPerDay, v)),
        percentage_of_all_posts: raw(Field::PercentageOfAllPosts)
            .and_then(|v| to_decimal(Field::PercentageOfAllPosts, v)),
        has_thanked: raw(Field::HasThanked).and_then(|v| to_count(Field::HasThanked, v)),
        been_thanked: raw(Field::BeenThanked).and_then(|v| to_count(Field::BeenThanked, v)),
    }
}

fn to_count(field: Field, value: String) -> Result<u64, ExtractError> {
    parse_grouped_int(&value)
        .or_else(|| first_grouped_int(&value))
        .ok_or(ExtractError::Unparseable {
            field: field.name(),
            raw: value,
        })
}

fn to_decimal(field: Field, value: String) -> Result<f64, ExtractError> {
    parse_decimal(&value).ok_or(ExtractError::Unparseable {
        field: field.name(),
        raw: value,
    })
}

/// Drops a trailing time of day: `"20 jan 2016, 10:21"` → `"20 jan 2016"`.
fn date_part(value: &str) -> String {
    TRAILING_TIME_RE.replace(value, "").trim().to_string()
}

#[cfg(test)]
#[path = "../extract_test.rs"]
mod tests;
