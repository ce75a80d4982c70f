//! Snapshot data model served by the HTTP layer.
//!
//! Field names serialize in camelCase because the dashboard reads them
//! directly (`stats.totalPosts`, `scrapedAt`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One complete result of the scrape → extract → aggregate pipeline.
///
/// `fallback` is `true` when `stats` is the fixed fallback bundle rather
/// than values read from the profile page; `error` then carries the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSnapshot {
    pub username: String,
    pub profile_url: String,
    pub scraped_at: DateTime<Utc>,
    pub stats: ProfileStats,
    pub activity: ActivityStats,
    pub fallback: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Headline statistics read from the profile page.
///
/// Every field is optional and serializes as `null` when the page did not
/// yield it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    pub total_posts: Option<u64>,
    pub joined_date: Option<String>,
    pub last_active: Option<String>,
    pub posts_per_day: Option<f64>,
    pub percentage_of_all_posts: Option<f64>,
    pub has_thanked: Option<u64>,
    pub been_thanked: Option<u64>,
    pub days_since_joined: Option<i64>,
    pub average_posts_per_day: Option<f64>,
}

/// Aggregates computed from the member's recent posts (search result pages).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStats {
    pub source_url: Option<String>,
    /// Number of posts the aggregates were computed from.
    pub sample_size: usize,
    pub posts_last_30_minutes: usize,
    pub posts_last_hour: usize,
    pub posts_last_day: usize,
    pub posts_last_week: usize,
    pub hourly_histogram: Vec<HourBucket>,
    pub most_active_hour: Option<u32>,
    pub peak_hours: Vec<u32>,
    pub top_topics: Vec<TopicCount>,
    pub monthly_history: Vec<MonthBucket>,
    pub average_minutes_between_posts: Option<f64>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourBucket {
    pub hour: u32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCount {
    pub title: String,
    pub url: Option<String>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthBucket {
    /// Calendar month as `YYYY-MM`.
    pub month: String,
    pub count: usize,
}

impl ActivityStats {
    /// Activity block with every counter at zero, used when no search page
    /// could be read.
    #[must_use]
    pub fn empty(error: Option<String>) -> Self {
        Self {
            source_url: None,
            sample_size: 0,
            posts_last_30_minutes: 0,
            posts_last_hour: 0,
            posts_last_day: 0,
            posts_last_week: 0,
            hourly_histogram: (0..24).map(|hour| HourBucket { hour, count: 0 }).collect(),
            most_active_hour: None,
            peak_hours: Vec::new(),
            top_topics: Vec::new(),
            monthly_history: Vec::new(),
            average_minutes_between_posts: None,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_stats_serialize_missing_fields_as_null() {
        let stats = ProfileStats {
            total_posts: Some(12),
            ..ProfileStats::default()
        };
        let json = serde_json::to_value(&stats).expect("serialize");
        assert_eq!(json["totalPosts"], 12);
        assert!(json["joinedDate"].is_null());
        assert!(json["averagePostsPerDay"].is_null());
    }

    #[test]
    fn snapshot_omits_error_when_absent() {
        let snapshot = ProfileSnapshot {
            username: "Renny".to_string(),
            profile_url: "https://forum.example/profile".to_string(),
            scraped_at: Utc::now(),
            stats: ProfileStats::default(),
            activity: ActivityStats::empty(None),
            fallback: false,
            error: None,
        };
        let json = serde_json::to_value(&snapshot).expect("serialize");
        assert!(json.get("error").is_none());
        assert_eq!(json["profileUrl"], "https://forum.example/profile");
        assert_eq!(json["activity"]["hourlyHistogram"].as_array().map(Vec::len), Some(24));
    }
}
