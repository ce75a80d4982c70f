//! Host extraction for log fields and error messages.

/// Extracts the hostname from a page URL.
///
/// Falls back to the full URL string if parsing fails.
pub(crate) fn extract_host(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}
