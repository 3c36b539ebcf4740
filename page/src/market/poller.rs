//! Stats Poller
//!
//! One sequential task that keeps the displayed statistics current: an
//! immediate fetch on startup, then one per fixed interval. A failed
//! cycle schedules exactly one extra retry after a short delay; because
//! the poller is a single task, the retry can never race a
//! normal-interval fetch on the same fields.
//!
//! On failure every field shows the error marker except the price-change
//! text and its trend color, which are preserved from the last success so
//! an outage does not erase the direction the user last saw.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{debug, warn};

use super::{FeedError, MarketFeed, StatField, StatsBoard, StatsSnapshot, ERROR_MARKER};

/// Poller timing configuration.
#[derive(Clone, Debug)]
pub struct PollerConfig {
    /// Normal fetch cadence.
    pub interval: Duration,
    /// Delay before the single extra retry after a failed cycle.
    pub retry_delay: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            retry_delay: Duration::from_secs(5),
        }
    }
}

/// The market-statistics polling loop.
pub struct StatsPoller {
    feed: Arc<dyn MarketFeed>,
    board: Arc<dyn StatsBoard>,
    config: PollerConfig,
    last: Option<StatsSnapshot>,
}

impl StatsPoller {
    /// Create a poller. Nothing runs until [`StatsPoller::run`] or
    /// [`StatsPoller::cycle`].
    pub fn new(feed: Arc<dyn MarketFeed>, board: Arc<dyn StatsBoard>, config: PollerConfig) -> Self {
        Self {
            feed,
            board,
            config,
            last: None,
        }
    }

    /// Run for the lifetime of the page. Never returns; the caller
    /// decides how long the task lives.
    pub async fn run(mut self) {
        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            // First tick completes immediately, so startup fetches right
            // away and the interval counts from there.
            ticker.tick().await;
            if self.cycle().await.is_err() {
                sleep(self.config.retry_delay).await;
                // A second failure waits for the normal interval.
                let _ = self.cycle().await;
            }
        }
    }

    /// One fetch-and-render cycle. Public so tests and the simulator can
    /// drive cycles without the infinite loop.
    pub async fn cycle(&mut self) -> Result<(), FeedError> {
        match self.feed.fetch().await {
            Ok(payload) => {
                let snapshot = StatsSnapshot::render(&payload);
                self.apply(&snapshot);
                debug!("stats updated");
                self.last = Some(snapshot);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "stats fetch failed");
                self.apply_outage();
                Err(err)
            }
        }
    }

    /// The snapshot rendered by the last successful cycle.
    #[must_use]
    pub fn last_snapshot(&self) -> Option<&StatsSnapshot> {
        self.last.as_ref()
    }

    fn apply(&self, snapshot: &StatsSnapshot) {
        for (field, text) in &snapshot.fields {
            self.board.set_field(*field, text);
        }
        if let Some(trend) = snapshot.trend {
            self.board.set_trend(trend);
        }
    }

    fn apply_outage(&self) {
        let preserved_change = self
            .last
            .as_ref()
            .and_then(|snapshot| snapshot.change_text.clone());

        for field in StatField::ALL {
            if field == StatField::PriceChange {
                continue;
            }
            self.board.set_field(field, ERROR_MARKER);
        }
        // Price change keeps its last successful text; only a page that
        // never saw a success shows the marker there. The trend color is
        // left untouched entirely.
        match preserved_change {
            Some(change) => self.board.set_field(StatField::PriceChange, &change),
            None => self.board.set_field(StatField::PriceChange, ERROR_MARKER),
        }
    }
}
