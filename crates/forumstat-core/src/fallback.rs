//! The fixed statistics bundle served when the profile page cannot be read.
//!
//! These numbers were captured by hand from the live profile and are known to
//! go stale. They exist only so the dashboard never renders empty cards.

use crate::snapshot::ProfileStats;

pub const FALLBACK_TOTAL_POSTS: u64 = 120_735;
pub const FALLBACK_JOINED_DATE: &str = "20 jan 2016";
pub const FALLBACK_LAST_ACTIVE: &str = "16 jan 2026, 13:06";
pub const FALLBACK_POSTS_PER_DAY: f64 = 33.09;
pub const FALLBACK_PERCENTAGE_OF_ALL_POSTS: f64 = 2.54;
pub const FALLBACK_HAS_THANKED: u64 = 39;
pub const FALLBACK_BEEN_THANKED: u64 = 470;
pub const FALLBACK_DAYS_SINCE_JOINED: i64 = 3650;
pub const FALLBACK_AVERAGE_POSTS_PER_DAY: f64 = 33.09;

/// Returns the complete fallback bundle.
#[must_use]
pub fn fallback_stats() -> ProfileStats {
    ProfileStats {
        total_posts: Some(FALLBACK_TOTAL_POSTS),
        joined_date: Some(FALLBACK_JOINED_DATE.to_string()),
        last_active: Some(FALLBACK_LAST_ACTIVE.to_string()),
        posts_per_day: Some(FALLBACK_POSTS_PER_DAY),
        percentage_of_all_posts: Some(FALLBACK_PERCENTAGE_OF_ALL_POSTS),
        has_thanked: Some(FALLBACK_HAS_THANKED),
        been_thanked: Some(FALLBACK_BEEN_THANKED),
        days_since_joined: Some(FALLBACK_DAYS_SINCE_JOINED),
        average_posts_per_day: Some(FALLBACK_AVERAGE_POSTS_PER_DAY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_bundle_is_fully_populated() {
        let stats = fallback_stats();
        let json = serde_json::to_value(&stats).expect("serialize");
        let obj = json.as_object().expect("object");
        assert_eq!(obj.len(), 9);
        assert!(obj.values().all(|v| !v.is_null()), "no null in {json}");
        assert_eq!(json["totalPosts"], 120_735);
        assert_eq!(json["joinedDate"], "20 jan 2016");
    }
}
