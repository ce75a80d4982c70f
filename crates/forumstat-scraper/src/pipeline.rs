//! Scrape → extract → aggregate, producing one [`ProfileSnapshot`].
//!
//! Failures never escape this module. A failed profile fetch or a page
//! without a post count yields the fixed fallback bundle; a failed search
//! fetch yields an empty activity block. Both carry the error text.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use forumstat_core::fallback::fallback_stats;
use forumstat_core::{ActivityStats, ProfileSnapshot, ProfileStats};

use crate::activity::parse_search_results;
use crate::aggregate::{activity_stats, derive_membership};
use crate::client::{extract_host, ForumClient};
use crate::error::ExtractError;
use crate::extract::{extract_profile, RawProfile};

/// Whose profile to scrape and where to find their recent posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileTarget {
    pub username: String,
    pub profile_url: String,
    /// Search result pages, tried in order until one answers.
    pub search_urls: Vec<String>,
    /// Zone the board prints post times in.
    pub board_tz: Tz,
}

/// Headline stats plus whether they are the fallback bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsOutcome {
    pub stats: ProfileStats,
    pub fallback: bool,
    pub error: Option<String>,
}

impl StatsOutcome {
    fn fallback(error: String) -> Self {
        Self {
            stats: fallback_stats(),
            fallback: true,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProfileScraper {
    client: ForumClient,
    target: ProfileTarget,
}

impl ProfileScraper {
    #[must_use]
    pub fn new(client: ForumClient, target: ProfileTarget) -> Self {
        Self { client, target }
    }

    /// Runs the full pipeline once. Always returns a snapshot.
    pub async fn snapshot(&self, now: DateTime<Utc>) -> ProfileSnapshot {
        let outcome = self.profile_stats(now).await;
        let activity = self.recent_activity(now).await;

        tracing::info!(
            username = %self.target.username,
            fallback = outcome.fallback,
            total_posts = ?outcome.stats.total_posts,
            sample_size = activity.sample_size,
            "profile snapshot built"
        );

        ProfileSnapshot {
            username: self.target.username.clone(),
            profile_url: self.target.profile_url.clone(),
            scraped_at: now,
            stats: outcome.stats,
            activity,
            fallback: outcome.fallback,
            error: outcome.error,
        }
    }

    async fn profile_stats(&self, now: DateTime<Utc>) -> StatsOutcome {
        let url = &self.target.profile_url;
        match self.client.fetch_html(url).await {
            Ok(markup) => stats_from_markup(&markup, now),
            Err(e) => {
                tracing::warn!(
                    host = %extract_host(url),
                    error = %e,
                    "profile fetch failed; serving fallback stats"
                );
                StatsOutcome::fallback(e.to_string())
            }
        }
    }

    async fn recent_activity(&self, now: DateTime<Utc>) -> ActivityStats {
        match self.client.fetch_first_success(&self.target.search_urls).await {
            Ok((url, markup)) => {
                let board_tz = self.target.board_tz;
                let posts = parse_search_results(&markup, &url, board_tz, now);
                tracing::debug!(url = %url, posts = posts.len(), tz = %board_tz, "search page parsed");
                activity_stats(&posts, Some(url), now, board_tz)
            }
            Err(e) => {
                tracing::warn!(error = %e, "no search page answered; activity left empty");
                ActivityStats::empty(Some(e.to_string()))
            }
        }
    }
}

/// Extracts and derives the headline stats from a profile page.
///
/// A page without a post count is treated as unreadable and replaced with
/// the fallback bundle. Any other missing field is left `None`.
#[must_use]
pub fn stats_from_markup(markup: &str, now: DateTime<Utc>) -> StatsOutcome {
    resolve_stats(extract_profile(markup), now)
}

fn resolve_stats(raw: RawProfile, now: DateTime<Utc>) -> StatsOutcome {
    let total_posts = match raw.total_posts {
        Ok(total) => total,
        Err(e) => {
            tracing::warn!(error = %e, "profile page has no post count; serving fallback stats");
            return StatsOutcome::fallback(e.to_string());
        }
    };

    let mut stats = ProfileStats {
        total_posts: Some(total_posts),
        joined_date: optional(raw.joined_date),
        last_active: optional(raw.last_active),
        posts_per_day: optional(raw.posts_per_day),
        percentage_of_all_posts: optional(raw.percentage_of_all_posts),
        has_thanked: optional(raw.has_thanked),
        been_thanked: optional(raw.been_thanked),
        days_since_joined: None,
        average_posts_per_day: None,
    };
    derive_membership(&mut stats, now);

    StatsOutcome {
        stats,
        fallback: false,
        error: None,
    }
}

fn optional<T>(value: Result<T, ExtractError>) -> Option<T> {
    match value {
        Ok(v) => Some(v),
        Err(e @ ExtractError::Unparseable { .. }) => {
            tracing::warn!(error = %e, "profile field left empty");
            None
        }
        Err(e @ ExtractError::Missing { .. }) => {
            tracing::debug!(error = %e, "profile field left empty");
            None
        }
    }
}
