//! In-memory snapshot cache with a freshness window.
//!
//! Holds at most one snapshot. A read inside the window serves it; anything
//! else runs the refresh future and stores its result. The lock is never
//! held while a refresh runs, so two concurrent misses both scrape and the
//! later store wins.

use std::future::Future;

use chrono::{DateTime, TimeDelta, Utc};
use forumstat_core::ProfileSnapshot;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Empty,
    Fresh,
    Stale,
}

impl CacheState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CacheState::Empty => "empty",
            CacheState::Fresh => "fresh",
            CacheState::Stale => "stale",
        }
    }
}

#[derive(Debug, Clone)]
struct CachedSnapshot {
    snapshot: ProfileSnapshot,
    stored_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct SnapshotCache {
    freshness: TimeDelta,
    entry: RwLock<Option<CachedSnapshot>>,
}

impl SnapshotCache {
    /// Creates an empty cache whose entries stay fresh for `ttl_secs`.
    #[must_use]
    pub fn new(ttl_secs: u64) -> Self {
        let freshness = i64::try_from(ttl_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);
        Self {
            freshness,
            entry: RwLock::new(None),
        }
    }

    pub async fn state(&self, now: DateTime<Utc>) -> CacheState {
        match self.entry.read().await.as_ref() {
            None => CacheState::Empty,
            Some(cached) if self.is_fresh(cached, now) => CacheState::Fresh,
            Some(_) => CacheState::Stale,
        }
    }

    /// Returns the stored snapshot if it is still inside the window.
    pub async fn fresh(&self, now: DateTime<Utc>) -> Option<ProfileSnapshot> {
        self.entry
            .read()
            .await
            .as_ref()
            .filter(|cached| self.is_fresh(cached, now))
            .map(|cached| cached.snapshot.clone())
    }

    /// Replaces the stored snapshot.
    pub async fn store(&self, snapshot: ProfileSnapshot, now: DateTime<Utc>) {
        *self.entry.write().await = Some(CachedSnapshot {
            snapshot,
            stored_at: now,
        });
    }

    /// Serves the fresh snapshot, or awaits `refresh` and stores its result.
    ///
    /// The returned flag is `true` when the snapshot came from the cache.
    pub async fn get_or_refresh<F, Fut>(
        &self,
        now: DateTime<Utc>,
        refresh: F,
    ) -> (ProfileSnapshot, bool)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ProfileSnapshot>,
    {
        if let Some(snapshot) = self.fresh(now).await {
            tracing::debug!("serving cached snapshot");
            return (snapshot, true);
        }

        let snapshot = refresh().await;
        self.store(snapshot.clone(), now).await;
        (snapshot, false)
    }

    fn is_fresh(&self, cached: &CachedSnapshot, now: DateTime<Utc>) -> bool {
        now - cached.stored_at < self.freshness
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::TimeZone;
    use forumstat_core::{ActivityStats, ProfileStats};

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap() + TimeDelta::seconds(secs)
    }

    fn snapshot(total: u64, scraped_at: DateTime<Utc>) -> ProfileSnapshot {
        ProfileSnapshot {
            username: "Renny".to_string(),
            profile_url: "https://forum.example/profile".to_string(),
            scraped_at,
            stats: ProfileStats {
                total_posts: Some(total),
                ..ProfileStats::default()
            },
            activity: ActivityStats::empty(None),
            fallback: false,
            error: None,
        }
    }

    #[tokio::test]
    async fn lifecycle_empty_fresh_stale() {
        let cache = SnapshotCache::new(300);
        assert_eq!(cache.state(at(0)).await, CacheState::Empty);

        cache.store(snapshot(1, at(0)), at(0)).await;
        assert_eq!(cache.state(at(0)).await, CacheState::Fresh);
        assert_eq!(cache.state(at(299)).await, CacheState::Fresh);
        assert_eq!(cache.state(at(300)).await, CacheState::Stale);
        assert!(cache.fresh(at(300)).await.is_none());
    }

    #[tokio::test]
    async fn second_read_inside_window_skips_refresh() {
        let cache = SnapshotCache::new(300);
        let calls = AtomicUsize::new(0);
        let refresh = |n: u64| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { snapshot(n, at(0)) }
        };

        let (first, cached) = cache.get_or_refresh(at(0), || refresh(1)).await;
        assert!(!cached);
        assert_eq!(first.stats.total_posts, Some(1));

        let (second, cached) = cache.get_or_refresh(at(120), || refresh(2)).await;
        assert!(cached);
        assert_eq!(second, first);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stale_entry_is_replaced() {
        let cache = SnapshotCache::new(300);
        cache.store(snapshot(1, at(0)), at(0)).await;

        let (refreshed, cached) = cache
            .get_or_refresh(at(301), || async { snapshot(2, at(301)) })
            .await;
        assert!(!cached);
        assert_eq!(refreshed.stats.total_posts, Some(2));
        assert_eq!(
            cache.fresh(at(302)).await.and_then(|s| s.stats.total_posts),
            Some(2)
        );
    }

    #[tokio::test]
    async fn zero_ttl_never_serves_cached() {
        let cache = SnapshotCache::new(0);
        cache.store(snapshot(1, at(0)), at(0)).await;
        assert_eq!(cache.state(at(0)).await, CacheState::Stale);
    }
}
