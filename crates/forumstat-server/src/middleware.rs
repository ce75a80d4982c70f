use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied ID that is reused as-is.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Request ID carried as a request extension for handlers to log.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Tags every request with an ID, reusing a usable `x-request-id` from the
/// caller or minting a `UUIDv4`. Downstream logs run inside a `request` span
/// carrying the ID, and the response echoes it back.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = incoming_request_id(req.headers()).unwrap_or_else(|| Uuid::new_v4().to_string());
    req.extensions_mut().insert(RequestId(id.clone()));

    let span = tracing::debug_span!("request", request_id = %id);
    let mut res = next.run(req).instrument(span).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, val);
    }
    res
}

/// Caller's request ID, trimmed. Values that are blank or too long are
/// ignored, as are headers that are not visible ASCII.
fn incoming_request_id(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(REQUEST_ID_HEADER)?.to_str().ok()?.trim();
    if raw.is_empty() || raw.len() > MAX_REQUEST_ID_LEN {
        return None;
    }
    Some(raw.to_string())
}
