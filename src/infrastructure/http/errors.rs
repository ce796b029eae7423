//! Mapping of transport failures onto the interaction error taxonomy.
//!
//! Everything the HTTP adapter can see (status codes, connection problems,
//! undecodable bodies) is folded into `Unauthenticated`, `RateLimited` or
//! `Transient`, with the details logged at the point of conversion.

use crate::domain::interaction::InteractionError;
use http::StatusCode;

/// Classifies a non-success response from the interaction backend.
pub fn classify_status(status: StatusCode, body: &str) -> InteractionError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => {
            tracing::debug!(status = %status, "backend rate limited the request");
            InteractionError::RateLimited
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            tracing::warn!(status = %status, "backend rejected credentials");
            InteractionError::Unauthenticated
        }
        _ if status.is_server_error() => {
            tracing::error!(status = %status, body = %truncate(body), "backend failure");
            InteractionError::Transient(format!("server error {}", status.as_u16()))
        }
        _ => {
            tracing::warn!(status = %status, body = %truncate(body), "unexpected backend response");
            InteractionError::Transient(format!("unexpected status {}", status.as_u16()))
        }
    }
}

fn truncate(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((end, _)) => &body[..end],
        None => body,
    }
}

impl From<reqwest::Error> for InteractionError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return classify_status(status, "");
        }
        if err.is_timeout() {
            tracing::warn!(reqwest_timeout = %err);
            InteractionError::Transient("request timeout".into())
        } else if err.is_connect() {
            tracing::warn!(reqwest_connect = %err);
            InteractionError::Transient("connection failed".into())
        } else if err.is_decode() {
            tracing::warn!(reqwest_decode = %err);
            InteractionError::Transient("malformed response".into())
        } else {
            tracing::error!(reqwest_error = %err);
            InteractionError::Transient("request failed".into())
        }
    }
}
