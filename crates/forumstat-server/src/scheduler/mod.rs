//! Background cache warming.
//!
//! When `FORUMSTAT_WARM_CRON` is set, a [`JobScheduler`] re-scrapes the
//! profile on that schedule whenever the cached snapshot is missing or
//! stale, so dashboard requests rarely wait on the forum.

use chrono::Utc;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::api::AppState;
use crate::cache::CacheState;

/// Builds and starts the warm-up scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process; dropping it shuts the job down.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the cron expression is invalid, or the scheduler fails to start.
pub async fn build_scheduler(
    state: AppState,
    cron: &str,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_warm_job(&scheduler, state, cron).await?;

    scheduler.start().await?;
    tracing::info!(cron, "scheduler: cache warm job registered");
    Ok(scheduler)
}

async fn register_warm_job(
    scheduler: &JobScheduler,
    state: AppState,
    cron: &str,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(cron, move |_uuid, _lock| {
        let state = state.clone();

        Box::pin(async move {
            warm_cache(&state).await;
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

/// Refreshes the cache unless it already holds a fresh snapshot.
pub(crate) async fn warm_cache(state: &AppState) -> CacheState {
    let now = Utc::now();
    let before = state.cache.state(now).await;
    if before == CacheState::Fresh {
        tracing::debug!("scheduler: cache fresh; skipping warm run");
        return before;
    }

    tracing::info!(cache = before.as_str(), "scheduler: warming profile cache");
    let snapshot = state.scraper.snapshot(now).await;
    let fallback = snapshot.fallback;
    state.cache.store(snapshot, now).await;
    tracing::info!(fallback, "scheduler: warm run complete");
    before
}
