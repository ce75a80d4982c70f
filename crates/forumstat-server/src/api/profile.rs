use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::Utc;
use forumstat_core::ProfileSnapshot;
use serde::Serialize;

use super::{ApiError, AppState};
use crate::middleware::RequestId;

/// Snapshot plus whether it came from the cache.
#[derive(Debug, Serialize)]
pub(super) struct ProfileResponse<'a> {
    #[serde(flatten)]
    pub snapshot: &'a ProfileSnapshot,
    pub cached: bool,
}

pub(super) async fn get_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Response, ApiError> {
    let now = Utc::now();
    let scraper = &state.scraper;
    let (snapshot, cached) = state
        .cache
        .get_or_refresh(now, || scraper.snapshot(now))
        .await;

    tracing::debug!(
        request_id = %req_id.0,
        cached,
        fallback = snapshot.fallback,
        "serving profile snapshot"
    );

    let body = serde_json::to_value(ProfileResponse {
        snapshot: &snapshot,
        cached,
    })
    .map_err(|e| {
        tracing::error!(error = %e, "failed to serialize profile snapshot");
        ApiError::internal(req_id.0.clone(), "Failed to fetch data")
    })?;

    Ok(Json(body).into_response())
}
