//! Runtime Configuration
//!
//! Environment-driven configuration with compiled defaults. Every knob
//! the revisions of the page ever disagreed on (load timeout, clip path,
//! poll cadence) lives here so there is exactly one place they are
//! decided.

use std::time::Duration;

use crate::decor::DECOR_COUNT;
use crate::market::PollerConfig;
use crate::reveal::RevealConfig;

/// Configuration for the whole page runtime.
#[derive(Clone, Debug)]
pub struct PageConfig {
    /// Reveal intro parameters.
    pub reveal: RevealConfig,
    /// Poller timing.
    pub poller: PollerConfig,
    /// Number of decorative elements.
    pub decor_count: usize,
    /// Market-data endpoint the poller fetches from.
    pub data_url: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            reveal: RevealConfig::default(),
            poller: PollerConfig::default(),
            decor_count: DECOR_COUNT,
            data_url: "http://127.0.0.1:3000/api/data".to_string(),
        }
    }
}

impl PageConfig {
    /// Build configuration from `MUNKY_*` environment variables, falling
    /// back to the defaults for anything unset or unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("MUNKY_DATA_URL") {
            config.data_url = url;
        }
        if let Ok(path) = std::env::var("MUNKY_MEDIA_PATH") {
            config.reveal.media_path = path;
        }
        if let Some(ms) = env_u64("MUNKY_LOAD_TIMEOUT_MS") {
            config.reveal.load_timeout = Duration::from_millis(ms);
        }
        if let Some(secs) = env_u64("MUNKY_POLL_INTERVAL_SECS") {
            config.poller.interval = Duration::from_secs(secs);
        }
        if let Some(secs) = env_u64("MUNKY_RETRY_DELAY_SECS") {
            config.poller.retry_delay = Duration::from_secs(secs);
        }
        if let Some(count) = env_u64("MUNKY_DECOR_COUNT") {
            config.decor_count = count as usize;
        }

        config
    }
}

fn env_u64(key: &str) -> Option<u64> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, raw, "ignoring unparsable environment variable");
            None
        }
    }
}
