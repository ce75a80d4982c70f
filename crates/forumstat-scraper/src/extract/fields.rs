//! Per-field strategy chains, in priority order.
//!
//! Text regexes run first because they cope with both the Dutch and English
//! board languages in a single pattern; DOM label lookups catch layouts where
//! label and value end up far apart in the flattened text.

use std::sync::LazyLock;

use crate::error::ExtractError;

use super::strategy::{FieldStrategy, LabelStrategy, RegexStrategy};
use super::ProfileDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    TotalPosts,
    JoinedDate,
    LastActive,
    PostsPerDay,
    PercentageOfAllPosts,
    HasThanked,
    BeenThanked,
}

impl Field {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Field::TotalPosts => "totalPosts",
            Field::JoinedDate => "joinedDate",
            Field::LastActive => "lastActive",
            Field::PostsPerDay => "postsPerDay",
            Field::PercentageOfAllPosts => "percentageOfAllPosts",
            Field::HasThanked => "hasThanked",
            Field::BeenThanked => "beenThanked",
        }
    }
}

/// A field together with the strategies that may produce it.
pub struct FieldChain {
    field: Field,
    strategies: Vec<Box<dyn FieldStrategy>>,
}

impl FieldChain {
    #[must_use]
    pub fn new(field: Field, strategies: Vec<Box<dyn FieldStrategy>>) -> Self {
        Self { field, strategies }
    }

    #[must_use]
    pub fn field(&self) -> Field {
        self.field
    }

    /// Runs the strategies in order and returns the first value produced.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Missing`] when every strategy gives up.
    pub fn run(&self, doc: &ProfileDocument) -> Result<String, ExtractError> {
        for strategy in &self.strategies {
            if let Some(value) = strategy.find(doc) {
                tracing::debug!(
                    field = self.field.name(),
                    strategy = %strategy.describe(),
                    value = %value,
                    "field extracted"
                );
                return Ok(value);
            }
        }
        Err(ExtractError::Missing {
            field: self.field.name(),
        })
    }
}

fn regex(pattern: &str) -> Box<dyn FieldStrategy> {
    Box::new(RegexStrategy::new(pattern))
}

fn label(labels: &'static [&'static str]) -> Box<dyn FieldStrategy> {
    Box::new(LabelStrategy::new(labels))
}

/// Strategy chains for every profile field.
pub(crate) static PROFILE_FIELDS: LazyLock<Vec<FieldChain>> = LazyLock::new(|| {
    vec![
        FieldChain::new(
            Field::TotalPosts,
            vec![
                regex(
                    r"(?i)\b(?:totaal aantal berichten|aantal berichten|berichten|total posts|posts)\s*:\s*(\d{1,3}(?:\s\d{3})+|\d+)",
                ),
                // a colon after a digit is a clock time, not a label
                regex(
                    r"(?i)(?:^|[^\d.,:]|\D:)(\d{1,3}(?:\s\d{3})+|\d+)\s*(?:berichten|posts|messages)\b",
                ),
                regex(r"(?i)(\d{6,})\s*(?:berichten|posts|aantal berichten)"),
                label(&["berichten", "aantal berichten", "total posts", "posts"]),
            ],
        ),
        FieldChain::new(
            Field::JoinedDate,
            vec![
                regex(
                    r"(?i)(?:lid geworden op|geregistreerd op|joined)\s*:?\s*(\d{1,2}\.?\s+[[:alpha:]]{3,10}\.?\s+\d{4})",
                ),
                regex(r"(?i)joined\s*:?\s*([[:alpha:]]{3,9}\.?\s+\d{1,2},?\s+\d{4})"),
                label(&["lid geworden op", "geregistreerd op", "joined"]),
            ],
        ),
        FieldChain::new(
            Field::LastActive,
            vec![
                regex(
                    r"(?i)(?:laatst actief|last active)\s*:?\s*(\d{1,2}\.?\s+[[:alpha:]]{3,10}\.?\s+\d{4}(?:\s*,\s*\d{1,2}:\d{2})?)",
                ),
                label(&["laatst actief", "last active", "laatste bezoek", "last visited"]),
            ],
        ),
        FieldChain::new(
            Field::PostsPerDay,
            vec![regex(
                r"(?i)(\d+(?:[.,]\d+)?)\s*(?:berichten per dag|posts per day)",
            )],
        ),
        FieldChain::new(
            Field::PercentageOfAllPosts,
            vec![regex(
                r"(?i)(\d+(?:[.,]\d+)?)\s*%\s*(?:van alle berichten|of all posts)",
            )],
        ),
        FieldChain::new(
            Field::HasThanked,
            vec![
                regex(r"(?i)(?:has thanked|heeft bedankt)\s*:?\s*(\d+)\s*(?:times|keer)\b"),
                label(&["has thanked", "heeft bedankt"]),
            ],
        ),
        FieldChain::new(
            Field::BeenThanked,
            vec![
                regex(
                    r"(?i)(?:been thanked|is bedankt|werd bedankt)\s*:?\s*(\d+)\s*(?:times|keer)\b",
                ),
                label(&["been thanked", "is bedankt", "werd bedankt"]),
            ],
        ),
    ]
});
