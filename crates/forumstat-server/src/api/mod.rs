mod profile;

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use forumstat_scraper::ProfileScraper;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::cache::SnapshotCache;
use crate::middleware::{request_id, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub scraper: Arc<ProfileScraper>,
    pub cache: Arc<SnapshotCache>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    #[serde(skip)]
    pub request_id: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    cache: &'static str,
}

impl ApiError {
    pub fn internal(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            request_id: request_id.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!(request_id = %self.request_id, error = %self.error, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
}

/// Builds the router: JSON endpoints under `/api`, everything else served
/// from `static_dir`.
pub fn build_app(state: AppState, static_dir: &Path) -> Router {
    let api_routes = Router::new()
        .route("/api/health", get(health))
        .route("/api/profile", get(profile::get_profile))
        .route("/api/renny", get(profile::get_profile));

    Router::new()
        .merge(api_routes)
        .fallback_service(ServeDir::new(static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(build_cors()),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let cache = state.cache.state(Utc::now()).await;
    Json(HealthData {
        status: "ok",
        cache: cache.as_str(),
    })
}
