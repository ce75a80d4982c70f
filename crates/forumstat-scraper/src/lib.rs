//! Forum profile scraping: page fetching, field extraction, search result
//! parsing and the aggregates derived from them.

pub mod activity;
pub mod aggregate;
pub mod client;
pub mod error;
pub mod extract;
mod parse_helpers;
pub mod pipeline;

pub use activity::{parse_search_results, ForumPost};
pub use client::ForumClient;
pub use error::{ExtractError, ScraperError};
pub use extract::{extract_profile, RawProfile};
pub use pipeline::{stats_from_markup, ProfileScraper, ProfileTarget, StatsOutcome};
