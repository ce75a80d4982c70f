mod api;
mod cache;
mod middleware;
mod scheduler;

use std::sync::Arc;

use forumstat_scraper::{ForumClient, ProfileScraper, ProfileTarget};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    cache::SnapshotCache,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = forumstat_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let client = ForumClient::new(config.scraper_timeout_secs, &config.scraper_user_agent)?;
    let scraper = ProfileScraper::new(
        client,
        ProfileTarget {
            username: config.username.clone(),
            profile_url: config.profile_url.clone(),
            search_urls: config.search_urls.clone(),
            board_tz: config.board_tz,
        },
    );
    let state = AppState {
        scraper: Arc::new(scraper),
        cache: Arc::new(SnapshotCache::new(config.cache_ttl_secs)),
    };

    let _scheduler = match config.warm_cron.as_deref() {
        Some(cron) => Some(scheduler::build_scheduler(state.clone(), cron).await?),
        None => None,
    };

    let app = build_app(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        addr = %config.bind_addr,
        env = %config.env,
        username = %config.username,
        cache_ttl_secs = config.cache_ttl_secs,
        board_tz = %config.board_tz,
        static_dir = %config.static_dir.display(),
        "forumstat server listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM. A signal source that cannot be installed
/// is logged and never fires, so the other one still works.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        () = ctrl_c => "ctrl-c",
        () = terminate => "SIGTERM",
    };
    tracing::info!(signal, "shutting down; draining open requests");
}
