//! Derived statistics: membership age, windowed post counts, hour-of-day
//! histogram, top topics, monthly history and mean gap between posts.
//!
//! Everything here is pure; `now` is always passed in.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use forumstat_core::{ActivityStats, HourBucket, MonthBucket, ProfileStats, TopicCount};

use crate::activity::ForumPost;
use crate::parse_helpers::parse_forum_date;

pub const TOP_TOPICS_LIMIT: usize = 5;

/// Rounds to two decimal places.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Whole days elapsed between midnight (UTC) on `joined` and `now`.
#[must_use]
pub fn days_since(joined: NaiveDate, now: DateTime<Utc>) -> i64 {
    let joined_at = joined.and_time(chrono::NaiveTime::MIN).and_utc();
    (now - joined_at).num_days()
}

/// Fills `days_since_joined` and `average_posts_per_day`.
///
/// Both stay `None` unless the joined date parses, `total_posts` is known and
/// at least one full day has passed.
pub fn derive_membership(stats: &mut ProfileStats, now: DateTime<Utc>) {
    let Some(total) = stats.total_posts else {
        return;
    };
    let Some(joined) = stats.joined_date.as_deref().and_then(parse_forum_date) else {
        return;
    };
    let days = days_since(joined, now);
    if days <= 0 {
        return;
    }
    #[allow(clippy::cast_precision_loss)]
    let average = total as f64 / days as f64;
    stats.days_since_joined = Some(days);
    stats.average_posts_per_day = Some(round2(average));
}

/// Counts timestamps strictly newer than `now - window`.
#[must_use]
pub fn count_within(timestamps: &[DateTime<Utc>], now: DateTime<Utc>, window: Duration) -> usize {
    let cutoff = now - window;
    timestamps.iter().filter(|ts| **ts > cutoff).count()
}

/// 24 buckets, one per hour of day on the board's clock.
#[must_use]
pub fn hour_histogram(timestamps: &[DateTime<Utc>], board_tz: Tz) -> Vec<HourBucket> {
    let mut counts = [0usize; 24];
    for ts in timestamps {
        counts[ts.with_timezone(&board_tz).hour() as usize] += 1;
    }
    (0u32..)
        .zip(counts)
        .map(|(hour, count)| HourBucket { hour, count })
        .collect()
}

/// Hour with the highest count; the earliest hour wins ties. `None` when
/// every bucket is empty.
#[must_use]
pub fn most_active_hour(histogram: &[HourBucket]) -> Option<u32> {
    let mut best: Option<HourBucket> = None;
    for bucket in histogram.iter().filter(|b| b.count > 0) {
        if best.is_none_or(|b| bucket.count > b.count) {
            best = Some(*bucket);
        }
    }
    best.map(|b| b.hour)
}

/// Hours whose count reaches at least half of the busiest hour.
#[must_use]
pub fn peak_hours(histogram: &[HourBucket]) -> Vec<u32> {
    let max = histogram.iter().map(|b| b.count).max().unwrap_or(0);
    histogram
        .iter()
        .filter(|b| b.count > 0 && b.count * 2 >= max)
        .map(|b| b.hour)
        .collect()
}

/// Groups posts by topic URL (title when the URL is unknown) and returns the
/// `limit` busiest topics. Equal counts keep first-seen order.
#[must_use]
pub fn top_topics(posts: &[ForumPost], limit: usize) -> Vec<TopicCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut topics: Vec<TopicCount> = Vec::new();

    for post in posts {
        let key = post.topic_url.as_deref().unwrap_or(&post.topic_title);
        match index.get(key) {
            Some(&i) => topics[i].count += 1,
            None => {
                index.insert(key, topics.len());
                topics.push(TopicCount {
                    title: post.topic_title.clone(),
                    url: post.topic_url.clone(),
                    count: 1,
                });
            }
        }
    }

    // stable sort keeps first appearance among equals
    topics.sort_by(|a, b| b.count.cmp(&a.count));
    topics.truncate(limit);
    topics
}

/// Post counts per board-local calendar month (`YYYY-MM`), oldest first.
#[must_use]
pub fn monthly_history(timestamps: &[DateTime<Utc>], board_tz: Tz) -> Vec<MonthBucket> {
    let mut months: BTreeMap<String, usize> = BTreeMap::new();
    for ts in timestamps {
        let month = ts.with_timezone(&board_tz).format("%Y-%m").to_string();
        *months.entry(month).or_default() += 1;
    }
    months
        .into_iter()
        .map(|(month, count)| MonthBucket { month, count })
        .collect()
}

/// Mean gap in minutes between consecutive posts, rounded to two decimals.
#[must_use]
pub fn average_gap_minutes(timestamps: &[DateTime<Utc>]) -> Option<f64> {
    if timestamps.len() < 2 {
        return None;
    }
    let mut sorted = timestamps.to_vec();
    sorted.sort_unstable();

    let total: i64 = sorted
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_seconds())
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let mean_secs = total as f64 / (sorted.len() - 1) as f64;
    Some(round2(mean_secs / 60.0))
}

/// Builds the activity block from parsed search results.
#[must_use]
pub fn activity_stats(
    posts: &[ForumPost],
    source_url: Option<String>,
    now: DateTime<Utc>,
    board_tz: Tz,
) -> ActivityStats {
    let timestamps: Vec<DateTime<Utc>> = posts.iter().filter_map(|p| p.posted_at).collect();
    let histogram = hour_histogram(&timestamps, board_tz);

    ActivityStats {
        source_url,
        sample_size: posts.len(),
        posts_last_30_minutes: count_within(&timestamps, now, Duration::minutes(30)),
        posts_last_hour: count_within(&timestamps, now, Duration::hours(1)),
        posts_last_day: count_within(&timestamps, now, Duration::days(1)),
        posts_last_week: count_within(&timestamps, now, Duration::weeks(1)),
        most_active_hour: most_active_hour(&histogram),
        peak_hours: peak_hours(&histogram),
        hourly_histogram: histogram,
        top_topics: top_topics(posts, TOP_TOPICS_LIMIT),
        monthly_history: monthly_history(&timestamps, board_tz),
        average_minutes_between_posts: average_gap_minutes(&timestamps),
        error: None,
    }
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
