//! Reveal Controller
//!
//! Drives one reveal session from `Hiding` to `Done`. The controller owns
//! the session outright: `run` consumes it, so a session can never be
//! re-entered, and every node it injects is tracked by a [`Teardown`]
//! guard that drains on all exit paths, including cancellation.
//!
//! The mask animation is wall-clock driven: progress is elapsed time over
//! the configured duration, sampled on every frame tick, so the animation
//! takes the same real time at any frame rate.

use std::sync::Arc;

use tokio::time::{interval, sleep, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::media::Media;
use super::{FallbackReason, Phase, RevealConfig, RevealOutcome, RevealStyle};
use crate::stage::{NodeId, NodeKind, Point, Stage, VisibilityOwner};

/// Transient per-session state. One per page load.
#[derive(Debug)]
pub struct RevealSession {
    /// When the controller was constructed.
    pub started_at: Instant,
    /// Current lifecycle phase.
    pub phase: Phase,
    /// Media acquisition attempts made so far.
    pub attempts: u8,
    /// Anchor point computed at reveal time, if the session got that far.
    pub anchor: Option<Point>,
}

impl RevealSession {
    fn new() -> Self {
        Self {
            started_at: Instant::now(),
            phase: Phase::Idle,
            attempts: 0,
            anchor: None,
        }
    }
}

/// What a finished session hands back.
#[derive(Debug)]
pub struct RevealReport {
    /// Which terminal path ran.
    pub outcome: RevealOutcome,
    /// Final session state, phase always `Done`.
    pub session: RevealSession,
    /// Visibility ownership, returned with content restored.
    pub visibility: VisibilityOwner,
}

/// Owns every node injected during a session.
///
/// Draining removes each tracked node exactly once; draining again, or
/// draining after an already-removed node, is a no-op. The guard also
/// drains on drop so a cancelled session cannot leak an overlay that
/// blocks the page.
pub struct Teardown {
    stage: Arc<dyn Stage>,
    nodes: Vec<NodeId>,
}

impl std::fmt::Debug for Teardown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Teardown")
            .field("nodes", &self.nodes)
            .finish_non_exhaustive()
    }
}

impl Teardown {
    /// New empty guard over a stage.
    pub fn new(stage: Arc<dyn Stage>) -> Self {
        Self {
            stage,
            nodes: Vec::new(),
        }
    }

    /// Take ownership of an injected node.
    pub fn track(&mut self, id: NodeId) {
        self.nodes.push(id);
    }

    /// Nodes currently tracked.
    #[must_use]
    pub fn tracked(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Remove every tracked node from the stage.
    pub fn drain(&mut self) {
        for id in self.nodes.drain(..) {
            if !self.stage.remove(id) {
                debug!(%id, "node already gone during teardown");
            }
        }
    }
}

impl Drop for Teardown {
    fn drop(&mut self) {
        self.drain();
    }
}

/// One-shot reveal sequence controller.
pub struct RevealController {
    stage: Arc<dyn Stage>,
    media: Box<dyn Media>,
    visibility: VisibilityOwner,
    config: RevealConfig,
    session: RevealSession,
}

impl RevealController {
    /// Create a controller for one session. Nothing on the page is
    /// touched until [`RevealController::run`].
    pub fn new(
        stage: Arc<dyn Stage>,
        media: Box<dyn Media>,
        visibility: VisibilityOwner,
        config: RevealConfig,
    ) -> Self {
        Self {
            stage,
            media,
            visibility,
            config,
            session: RevealSession::new(),
        }
    }

    /// Run the session to completion.
    ///
    /// Exactly one of the animated reveal or the immediate fallback
    /// restore executes; either way the page ends with content visible
    /// and zero injected nodes remaining.
    pub async fn run(mut self) -> RevealReport {
        self.session.phase = Phase::Hiding;
        self.visibility.hide();

        let mut teardown = Teardown::new(self.stage.clone());
        let overlay = self.stage.inject(NodeKind::Overlay);
        teardown.track(overlay);
        let surface = match self.config.style {
            RevealStyle::Video => {
                let id = self.stage.inject(NodeKind::MediaSurface {
                    source: self.config.media_path.clone(),
                });
                teardown.track(id);
                Some(id)
            }
            RevealStyle::Particles => None,
        };

        let outcome = match self.drive(&mut teardown, overlay, surface).await {
            Ok(()) => {
                info!(
                    elapsed_ms = self.session.started_at.elapsed().as_millis() as u64,
                    "reveal completed"
                );
                RevealOutcome::Revealed
            }
            Err(reason) => {
                warn!(%reason, "reveal degraded to immediate restore");
                self.session.phase = Phase::FallbackReveal;
                RevealOutcome::Fallback(reason)
            }
        };

        // Terminal cleanup, shared by both paths and idempotent against
        // anything the animated path already restored or removed.
        self.visibility.restore();
        teardown.drain();
        self.session.phase = Phase::Done;

        RevealReport {
            outcome,
            session: self.session,
            visibility: self.visibility,
        }
    }

    async fn drive(
        &mut self,
        teardown: &mut Teardown,
        overlay: NodeId,
        surface: Option<NodeId>,
    ) -> Result<(), FallbackReason> {
        self.load().await?;
        self.play().await?;
        self.reveal(teardown, overlay, surface).await
    }

    /// `Loading`: wait for media readiness, bounded by the load timeout.
    ///
    /// On timeout the pending acquire future is dropped, which is the
    /// cancellation mechanism: a readiness signal that would have fired
    /// later has nothing left to resume.
    async fn load(&mut self) -> Result<(), FallbackReason> {
        self.session.phase = Phase::Loading;
        debug!(timeout_ms = self.config.load_timeout.as_millis() as u64, "loading intro media");

        let max_attempts = self.config.acquire_attempts.max(1);
        let timeout = self.config.load_timeout;
        let attempts = &mut self.session.attempts;
        let media = &mut self.media;

        tokio::select! {
            acquired = async {
                loop {
                    *attempts += 1;
                    match media.acquire().await {
                        Ok(()) => break Ok(()),
                        Err(err) if *attempts < max_attempts => {
                            warn!(error = %err, attempt = *attempts, "media acquisition retrying");
                        }
                        Err(err) => break Err(err),
                    }
                }
            } => acquired.map_err(FallbackReason::LoadFailed),
            () = sleep(timeout) => Err(FallbackReason::LoadTimeout),
        }
    }

    /// `Playing`: start playback and wait out the post-start delay.
    async fn play(&mut self) -> Result<(), FallbackReason> {
        self.session.phase = Phase::Playing;
        self.media
            .play()
            .await
            .map_err(FallbackReason::PlaybackRejected)?;
        sleep(self.config.play_delay).await;
        Ok(())
    }

    /// `Revealing`: restore content and expand the mask over it.
    async fn reveal(
        &mut self,
        teardown: &mut Teardown,
        overlay: NodeId,
        surface: Option<NodeId>,
    ) -> Result<(), FallbackReason> {
        // The anchor box must be read now, not earlier; layout may have
        // shifted while the clip loaded.
        let anchor = self
            .stage
            .anchor_rect()
            .ok_or(FallbackReason::AnchorMissing)?;
        let center = anchor.center();
        self.session.anchor = Some(center);
        self.session.phase = Phase::Revealing;

        self.visibility.restore();
        let mask = self.stage.inject(NodeKind::Mask { center });
        teardown.track(mask);

        let target_radius = self.stage.viewport().diagonal() * self.config.mask_safety;
        let duration = self.config.reveal_duration;
        let started = Instant::now();
        let mut frames = interval(self.config.frame_interval);
        frames.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            frames.tick().await;
            let progress =
                (started.elapsed().as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0);
            self.stage.set_mask_radius(mask, progress * target_radius);
            self.stage.set_opacity(overlay, 1.0 - progress);
            if let Some(id) = surface {
                self.stage.set_opacity(id, 1.0 - progress);
            }
            if progress >= 1.0 {
                break;
            }
        }
        Ok(())
    }
}
