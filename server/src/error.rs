//! API error taxonomy.
//!
//! Clients only ever see a 500 with a short fixed message. The underlying
//! cause is logged at the failure site, never serialized.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Upstream market-data fetch failed (transport error or non-2xx status).
    #[error("Error fetching data")]
    Upstream,
    /// The meme directory could not be read.
    #[error("Failed to load memes")]
    MemesUnavailable,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_fixed() {
        assert_eq!(ApiError::Upstream.to_string(), "Error fetching data");
        assert_eq!(
            ApiError::MemesUnavailable.to_string(),
            "Failed to load memes"
        );
    }
}
