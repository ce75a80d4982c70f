use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("page not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("empty response body from {url}")]
    EmptyBody { url: String },

    #[error("no source URLs configured")]
    NoSources,
}

/// Why a single profile field could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("field {field} not found in page")]
    Missing { field: &'static str },

    #[error("field {field} matched but could not be parsed: {raw:?}")]
    Unparseable { field: &'static str, raw: String },
}
