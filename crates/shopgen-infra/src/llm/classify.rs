//! Vendor failure classification.
//!
//! Every adapter funnels HTTP statuses and transport errors through these
//! functions so a failure is classified exactly once, at the network
//! boundary.

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde::Deserialize;

use shopgen_types::llm::ProviderError;

/// Longest vendor error body kept in an error message, in characters.
const MAX_DETAIL_CHARS: usize = 300;

/// Map a non-success HTTP status onto the error taxonomy.
pub fn classify_status(status: StatusCode, detail: &str, retry_after_ms: Option<u64>) -> ProviderError {
    let message = format!("HTTP {status}: {}", truncate(detail));
    match status.as_u16() {
        401 | 403 => ProviderError::Auth(message),
        429 => ProviderError::RateLimited {
            message,
            retry_after_ms,
        },
        400 | 404 | 413 | 415 | 422 => ProviderError::UnsupportedInput(message),
        _ => ProviderError::Transient(message),
    }
}

/// Map a reqwest transport error. Timeouts and connection failures are
/// transient; a request that could not even be built is a configuration
/// problem.
pub fn classify_transport(err: &reqwest::Error) -> ProviderError {
    if err.is_builder() {
        ProviderError::UnsupportedInput(format!("invalid request: {err}"))
    } else if err.is_timeout() {
        ProviderError::Transient(format!("request timed out: {err}"))
    } else {
        ProviderError::Transient(format!("HTTP request failed: {err}"))
    }
}

/// `Retry-After` in milliseconds, when given as delta-seconds.
pub fn retry_after_ms(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| secs.saturating_mul(1000))
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// The `error.message` of an Anthropic- or OpenAI-style error body, or the
/// raw body when it has another shape.
pub fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => body.trim().to_string(),
    }
}

fn truncate(detail: &str) -> &str {
    match detail.char_indices().nth(MAX_DETAIL_CHARS) {
        Some((byte, _)) => &detail[..byte],
        None => detail,
    }
}
