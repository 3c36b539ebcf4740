//! Market Feed
//!
//! The fetch seam behind the poller. Production uses [`HttpFeed`] against
//! the page's own `/api/data` endpoint; tests script outages and payloads
//! with [`ScriptedFeed`].

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::debug;

use super::MarketPayload;

/// Errors from one fetch cycle. All of them mean the same thing to the
/// poller - upstream unavailable this cycle.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("endpoint returned {0}")]
    Status(reqwest::StatusCode),

    /// The body was not the expected payload shape.
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Source of market-data payloads.
#[async_trait]
pub trait MarketFeed: Send + Sync {
    /// Fetch the current payload. One request, no retry at this layer.
    async fn fetch(&self) -> Result<MarketPayload, FeedError>;
}

/// HTTP feed against the market-data endpoint.
#[derive(Clone, Debug)]
pub struct HttpFeed {
    client: reqwest::Client,
    url: String,
}

impl HttpFeed {
    /// Feed fetching from `url` with a default client.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Feed reusing an existing client.
    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl MarketFeed for HttpFeed {
    async fn fetch(&self) -> Result<MarketPayload, FeedError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }
        let bytes = response.bytes().await?;
        let payload = serde_json::from_slice(&bytes)?;
        debug!(url = %self.url, "market payload fetched");
        Ok(payload)
    }
}

/// One scripted fetch result.
#[derive(Clone, Debug)]
pub enum FeedStep {
    /// Fetch succeeds with this payload.
    Payload(MarketPayload),
    /// Fetch fails as an upstream outage.
    Outage,
}

/// Scripted feed for tests and the headless simulator. Steps are consumed
/// in order; once exhausted, every further fetch is an outage.
#[derive(Debug, Default)]
pub struct ScriptedFeed {
    steps: Mutex<VecDeque<FeedStep>>,
    fetches: AtomicUsize,
}

impl ScriptedFeed {
    /// Feed that replays `steps` in order.
    pub fn new(steps: impl IntoIterator<Item = FeedStep>) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter().collect()),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Feed that always fails.
    pub fn always_down() -> Self {
        Self::new([])
    }

    /// How many fetches have been made.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Append another step.
    pub fn push(&self, step: FeedStep) {
        self.steps.lock().push_back(step);
    }
}

#[async_trait]
impl MarketFeed for ScriptedFeed {
    async fn fetch(&self) -> Result<MarketPayload, FeedError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match self.steps.lock().pop_front() {
            Some(FeedStep::Payload(payload)) => Ok(payload),
            Some(FeedStep::Outage) | None => {
                Err(FeedError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_feed_replays_in_order() {
        let feed = ScriptedFeed::new([
            FeedStep::Payload(MarketPayload::default()),
            FeedStep::Outage,
        ]);

        assert!(feed.fetch().await.is_ok());
        assert!(feed.fetch().await.is_err());
        // Exhausted steps keep failing.
        assert!(feed.fetch().await.is_err());
        assert_eq!(feed.fetch_count(), 3);
    }
}
