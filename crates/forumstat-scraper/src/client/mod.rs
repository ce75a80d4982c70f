//! HTTP client for forum HTML pages.

mod origin;

use std::time::Duration;

use reqwest::Client;

use crate::error::ScraperError;

pub(crate) use origin::extract_host;

/// Fetches forum pages with a browser user-agent and a bounded timeout.
///
/// Each URL is tried exactly once. Non-2xx responses and empty bodies are
/// reported as typed errors so the pipeline can decide what to fall back to.
#[derive(Debug, Clone)]
pub struct ForumClient {
    client: Client,
}

impl ForumClient {
    /// Creates a `ForumClient` with the given request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches one page and returns its body as text.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::NotFound`] on HTTP 404.
    /// - [`ScraperError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`ScraperError::EmptyBody`] when the body is blank.
    /// - [`ScraperError::Http`] on network failure or timeout.
    pub async fn fetch_html(&self, url: &str) -> Result<String, ScraperError> {
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "nl-BE,nl;q=0.9,en;q=0.8")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(ScraperError::EmptyBody {
                url: url.to_owned(),
            });
        }

        tracing::debug!(host = %extract_host(url), bytes = body.len(), "fetched page");
        Ok(body)
    }

    /// Tries each URL in order and returns `(url, body)` for the first one
    /// that answers successfully.
    ///
    /// # Errors
    ///
    /// Returns the last URL's error when every candidate fails, or
    /// [`ScraperError::NoSources`] when `urls` is empty.
    pub async fn fetch_first_success(
        &self,
        urls: &[String],
    ) -> Result<(String, String), ScraperError> {
        let mut last_err = ScraperError::NoSources;

        for url in urls {
            match self.fetch_html(url).await {
                Ok(body) => return Ok((url.clone(), body)),
                Err(e) => {
                    tracing::warn!(
                        host = %extract_host(url),
                        url = %url,
                        error = %e,
                        "candidate page failed; trying next"
                    );
                    last_err = e;
                }
            }
        }

        Err(last_err)
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
