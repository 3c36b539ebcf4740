//! API route handlers.
//!
//! Two endpoints:
//! - `/api/data` proxies the upstream market-data API, hiding its URL and
//!   headers from the browser and collapsing every failure to one message.
//! - `/api/memes` lists image files in the meme directory, minus a fixed
//!   denylist of files the page renders elsewhere.

use std::path::Path;

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::AppState;

/// Extensions accepted by the meme listing, compared case-insensitively.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Files never returned by `/api/memes` even when present in the directory.
pub const EXCLUDED_MEMES: &[&str] = &["1.jpg", "2.jpg", "3.jpg"];

/// Proxy the upstream market-data API.
///
/// A 2xx upstream body is passed through verbatim. Any transport error or
/// non-2xx status becomes a 500 with a fixed body.
pub async fn fetch_data(State(state): State<AppState>) -> Result<Response, ApiError> {
    let response = state
        .client
        .get(&state.config.upstream_url)
        .header(header::ACCEPT, "application/json")
        .header(header::USER_AGENT, "Mozilla/5.0")
        .header(header::CACHE_CONTROL, "no-cache")
        .send()
        .await
        .map_err(|err| {
            warn!("Upstream request failed: {err}");
            ApiError::Upstream
        })?;

    let status = response.status();
    if !status.is_success() {
        warn!(%status, "Upstream returned an error status");
        return Err(ApiError::Upstream);
    }

    let body = response.bytes().await.map_err(|err| {
        warn!("Failed reading upstream body: {err}");
        ApiError::Upstream
    })?;

    debug!(bytes = body.len(), "Proxied upstream payload");
    Ok((
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response())
}

/// List meme image filenames, sorted, excluding the denylist.
pub async fn list_memes(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let mut entries = tokio::fs::read_dir(&state.config.memes_dir)
        .await
        .map_err(|err| {
            warn!(dir = %state.config.memes_dir.display(), "Failed to read meme directory: {err}");
            ApiError::MemesUnavailable
        })?;

    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|err| {
        warn!("Failed to read directory entry: {err}");
        ApiError::MemesUnavailable
    })? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_image(&name) && !EXCLUDED_MEMES.contains(&name.as_str()) {
            names.push(name);
        }
    }

    names.sort();
    debug!(count = names.len(), "Listed memes");
    Ok(Json(names))
}

fn is_image(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
