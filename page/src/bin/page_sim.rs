//! Headless page simulator.
//!
//! Runs the full page lifecycle against an in-memory stage: scatters the
//! decoration, plays the reveal intro (with the configured on-disk clip,
//! degrading to the fallback restore when it is absent), then drives a
//! few poller cycles against the configured market-data endpoint. Useful
//! as a smoke test of the runtime without any server or surface attached.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use munky_page::market::{HttpFeed, MemoryBoard, StatField, StatsPoller};
use munky_page::reveal::{AssetMedia, RevealController};
use munky_page::stage::{MemoryStage, Rect, Viewport, VisibilityOwner};
use munky_page::{DecorField, PageConfig, Stage};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = PageConfig::from_env();
    info!(?config, "simulating page load");

    let viewport = Viewport {
        width: 1280.0,
        height: 720.0,
    };
    let logo = Rect {
        x: 590.0,
        y: 310.0,
        width: 100.0,
        height: 100.0,
    };
    let stage = Arc::new(MemoryStage::with_anchor(viewport, logo));

    // Decoration starts independently of everything else.
    let mut decor = DecorField::with_count(stage.clone(), config.decor_count);
    decor.scatter();
    info!(nodes = stage.decor_count(), "decoration scattered");

    // The intro sequence.
    let media = AssetMedia::new(&config.reveal.media_path);
    let visibility = VisibilityOwner::claim(stage.clone() as Arc<dyn Stage>);
    let controller = RevealController::new(
        stage.clone(),
        Box::new(media),
        visibility,
        config.reveal.clone(),
    );
    let report = controller.run().await;
    info!(outcome = ?report.outcome, attempts = report.session.attempts, "reveal finished");
    assert!(!stage.content_hidden(), "content must be visible after the reveal");

    // A few poller cycles against the real endpoint.
    let board = Arc::new(MemoryBoard::new());
    let feed = Arc::new(HttpFeed::new(&config.data_url));
    let mut poller = StatsPoller::new(feed, board.clone(), config.poller.clone());
    for _ in 0..3 {
        let _ = poller.cycle().await;
        info!(
            price = board.field(StatField::Price).as_deref().unwrap_or("-"),
            change = board.field(StatField::PriceChange).as_deref().unwrap_or("-"),
            "poller cycle"
        );
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    Ok(())
}
