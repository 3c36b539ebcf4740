//! Lifecycle properties of the reveal intro.
//!
//! Every test runs on a paused clock, so timers fire deterministically
//! and the wall-clock-driven animation is exact. The properties under
//! test: exactly one terminal path runs, no injected node survives a
//! session, content visibility always comes back, and the time a user
//! can be stuck looking at hidden content is bounded.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio::time::Instant;

use munky_page::reveal::{
    FallbackReason, RevealConfig, RevealController, RevealOutcome, ScriptedMedia,
};
use munky_page::stage::{MemoryStage, NodeKind, Rect, Stage, Viewport, VisibilityOwner};
use munky_page::Phase;

const VIEWPORT: Viewport = Viewport {
    width: 1280.0,
    height: 720.0,
};

const LOGO: Rect = Rect {
    x: 590.0,
    y: 310.0,
    width: 100.0,
    height: 100.0,
};

fn stage_with_logo() -> Arc<MemoryStage> {
    Arc::new(MemoryStage::with_anchor(VIEWPORT, LOGO))
}

fn controller(stage: Arc<MemoryStage>, media: ScriptedMedia) -> RevealController {
    let visibility = VisibilityOwner::claim(stage.clone() as Arc<dyn Stage>);
    RevealController::new(stage, Box::new(media), visibility, RevealConfig::default())
}

fn assert_clean_end(stage: &MemoryStage) {
    assert_eq!(stage.node_count(), 0, "no injected node may survive");
    assert!(!stage.content_hidden(), "content must be restored");
}

#[tokio::test(start_paused = true)]
async fn animated_reveal_runs_to_done() {
    let stage = stage_with_logo();
    let media = ScriptedMedia::ready_after(Duration::from_millis(100));
    let probe = media.probe();

    let report = controller(stage.clone(), media).run().await;

    assert!(report.outcome.is_revealed());
    assert_eq!(report.session.phase, Phase::Done);
    assert!(probe.play_reached());
    let anchor = report.session.anchor.expect("anchor point computed");
    assert_eq!(anchor.x, 640.0);
    assert_eq!(anchor.y, 360.0);
    assert_clean_end(&stage);
}

#[tokio::test(start_paused = true)]
async fn timeout_falls_back_and_late_ready_is_ignored() {
    let stage = stage_with_logo();
    let media = ScriptedMedia::ready_after(Duration::from_secs(10));
    let probe = media.probe();
    let config = RevealConfig::default();
    let timeout = config.load_timeout;

    let started = Instant::now();
    let report = controller(stage.clone(), media).run().await;
    let hidden_for = started.elapsed();

    assert!(matches!(
        report.outcome,
        RevealOutcome::Fallback(FallbackReason::LoadTimeout)
    ));
    // Hidden-content time is bounded by the timeout, never indefinite.
    assert!(hidden_for <= timeout + Duration::from_millis(50));
    // The abandoned load never completed and playback was never reached.
    assert!(!probe.acquire_completed());
    assert!(!probe.play_reached());
    assert_clean_end(&stage);
}

#[tokio::test(start_paused = true)]
async fn load_error_falls_back_immediately() {
    let stage = stage_with_logo();
    let media = ScriptedMedia::failing_after(Duration::from_millis(50));

    let started = Instant::now();
    let report = controller(stage.clone(), media).run().await;

    assert!(matches!(
        report.outcome,
        RevealOutcome::Fallback(FallbackReason::LoadFailed(_))
    ));
    // No point waiting out the timeout once the error is known.
    assert!(started.elapsed() < Duration::from_millis(200));
    assert_clean_end(&stage);
}

#[tokio::test(start_paused = true)]
async fn playback_rejection_falls_back() {
    let stage = stage_with_logo();
    let media = ScriptedMedia::rejecting_play();
    let probe = media.probe();

    let report = controller(stage.clone(), media).run().await;

    assert!(matches!(
        report.outcome,
        RevealOutcome::Fallback(FallbackReason::PlaybackRejected(_))
    ));
    assert!(probe.acquire_completed());
    assert!(!probe.play_reached());
    assert_clean_end(&stage);
}

#[tokio::test(start_paused = true)]
async fn missing_anchor_falls_back() {
    let stage = Arc::new(MemoryStage::new(VIEWPORT));
    let media = ScriptedMedia::ready();

    let report = controller(stage.clone(), media).run().await;

    assert!(matches!(
        report.outcome,
        RevealOutcome::Fallback(FallbackReason::AnchorMissing)
    ));
    assert!(report.session.anchor.is_none());
    assert_clean_end(&stage);
}

#[tokio::test(start_paused = true)]
async fn anchor_is_recomputed_at_reveal_time() {
    let stage = stage_with_logo();
    let media = ScriptedMedia::ready_after(Duration::from_millis(500));

    let handle = tokio::spawn(controller(stage.clone(), media).run());

    // Layout shifts while the clip is still loading.
    tokio::time::sleep(Duration::from_millis(200)).await;
    stage.set_anchor(Some(Rect {
        x: 0.0,
        y: 0.0,
        width: 50.0,
        height: 50.0,
    }));

    let report = handle.await.expect("controller task");
    let anchor = report.session.anchor.expect("anchor point computed");
    assert_eq!(anchor.x, 25.0);
    assert_eq!(anchor.y, 25.0);
    assert_clean_end(&stage);
}

#[tokio::test(start_paused = true)]
async fn content_is_hidden_while_loading() {
    let stage = stage_with_logo();
    let media = ScriptedMedia::ready_after(Duration::from_secs(1));

    let handle = tokio::spawn(controller(stage.clone(), media).run());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(stage.content_hidden());
    // Overlay plus media surface are in place.
    assert_eq!(stage.node_count(), 2);

    let _ = handle.await.expect("controller task");
    assert_clean_end(&stage);
}

#[tokio::test(start_paused = true)]
async fn mask_clears_the_viewport_diagonal() {
    let stage = stage_with_logo();
    let media = ScriptedMedia::ready();

    let handle = tokio::spawn(controller(stage.clone(), media).run());

    // play_delay (1s) + most of the 3s reveal: progress ~0.95.
    tokio::time::sleep(Duration::from_millis(3900)).await;
    let mask_radius = stage
        .nodes()
        .into_iter()
        .find_map(|(_, record)| match record.kind {
            NodeKind::Mask { .. } => Some(record.mask_radius),
            _ => None,
        })
        .expect("mask present mid-reveal");
    assert!(
        mask_radius > VIEWPORT.diagonal(),
        "late-reveal radius {mask_radius} must exceed the diagonal {}",
        VIEWPORT.diagonal()
    );

    // Overlay is fading with the same progress fraction.
    let overlay_opacity = stage
        .nodes()
        .into_iter()
        .find_map(|(_, record)| match record.kind {
            NodeKind::Overlay => Some(record.opacity),
            _ => None,
        })
        .expect("overlay present mid-reveal");
    assert!(overlay_opacity < 0.1);

    let report = handle.await.expect("controller task");
    assert!(report.outcome.is_revealed());
    assert_clean_end(&stage);
}
