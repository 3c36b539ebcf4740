//! Reveal Intro Sequence
//!
//! One-shot intro played on page load: page content is hidden, an intro
//! clip is acquired and played on a full-viewport overlay, then the page
//! is revealed through a circular mask expanding from the logo's position,
//! and finally every injected element is torn down.
//!
//! # State machine
//!
//! ```text
//! Idle ─► Hiding ─► Loading ─► Playing ─► Revealing ─► Done
//!                      │           │
//!                      │ timeout / │ rejected /
//!                      │ error     │ anchor missing
//!                      ▼           ▼
//!                    FallbackReveal ──────────────────► Done
//! ```
//!
//! `Idle` covers the window between construction and the `run` call;
//! nothing on the page is touched until `run`, and because `run` consumes
//! the controller no caller can observe a session between the two states
//! or drive one twice.
//!
//! Exactly one of the two terminal paths runs per session. The fallback
//! path restores content immediately and unanimated; it exists so a user
//! is never left staring at a permanently blocked page. Abandoned loading
//! work is cancelled structurally (the acquire future is dropped inside
//! `tokio::select!`), so a late readiness signal has nothing left to
//! resume.

pub mod controller;
pub mod media;

pub use controller::{RevealController, RevealReport, RevealSession, Teardown};
pub use media::{AssetMedia, Media, MediaError, MediaProbe, ScriptedMedia};

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Lifecycle phase of a reveal session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Phase {
    /// Controller constructed, nothing touched yet.
    #[default]
    Idle,
    /// Page content suppressed, overlay elements injected.
    Hiding,
    /// Waiting for the intro clip to become playable.
    Loading,
    /// Clip playing; waiting out the post-start delay.
    Playing,
    /// Mask expanding, overlay fading.
    Revealing,
    /// Degraded path: immediate, unanimated restore.
    FallbackReveal,
    /// All injected elements removed, content visible.
    Done,
}

impl Phase {
    /// Whether the session has finished, on either path.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Why a session took the fallback path.
#[derive(Debug, thiserror::Error)]
pub enum FallbackReason {
    /// The clip did not signal readiness within the load timeout.
    #[error("media load timed out")]
    LoadTimeout,
    /// The clip signalled a load error.
    #[error("media failed to load: {0}")]
    LoadFailed(#[from] MediaError),
    /// Playback start was rejected.
    #[error("playback start rejected: {0}")]
    PlaybackRejected(MediaError),
    /// The anchor element was absent at reveal time.
    #[error("anchor element missing at reveal time")]
    AnchorMissing,
}

/// How a session ended.
#[derive(Debug)]
pub enum RevealOutcome {
    /// The full animated reveal ran to completion.
    Revealed,
    /// The degraded immediate restore ran instead.
    Fallback(FallbackReason),
}

impl RevealOutcome {
    /// Whether the animated path completed.
    #[must_use]
    pub fn is_revealed(&self) -> bool {
        matches!(self, Self::Revealed)
    }
}

/// Visual treatment of the intro overlay.
///
/// The production page went through several revisions of the same effect;
/// they differ only in these parameters, so one controller covers all of
/// them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RevealStyle {
    /// Full-screen clip on a media surface.
    #[default]
    Video,
    /// Procedural particle overlay, no media surface.
    Particles,
}

/// Tunable parameters of the reveal sequence.
#[derive(Clone, Debug)]
pub struct RevealConfig {
    /// Visual treatment of the overlay.
    pub style: RevealStyle,
    /// Path of the intro clip shown on the media surface.
    pub media_path: String,
    /// How long to wait for media readiness before giving up.
    pub load_timeout: Duration,
    /// Delay between playback start and the reveal animation.
    pub play_delay: Duration,
    /// Duration of the expanding-mask animation.
    pub reveal_duration: Duration,
    /// Mask target radius as a multiple of the viewport diagonal.
    /// Must be >= 1 so the mask always clears the whole viewport.
    pub mask_safety: f32,
    /// Animation frame cadence. Progress is wall-clock driven, so this
    /// only bounds update granularity, never animation speed.
    pub frame_interval: Duration,
    /// Bounded number of media acquisition attempts within the timeout.
    pub acquire_attempts: u8,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            style: RevealStyle::Video,
            media_path: "public/intro.mp4".to_string(),
            load_timeout: Duration::from_millis(2500),
            play_delay: Duration::from_millis(1000),
            reveal_duration: Duration::from_millis(3000),
            mask_safety: 1.15,
            frame_interval: Duration::from_millis(16),
            acquire_attempts: 1,
        }
    }
}

impl RevealConfig {
    /// Set the load timeout.
    #[must_use]
    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = timeout;
        self
    }

    /// Set the reveal animation duration.
    #[must_use]
    pub fn with_reveal_duration(mut self, duration: Duration) -> Self {
        self.reveal_duration = duration;
        self
    }

    /// Set the visual style.
    #[must_use]
    pub fn with_style(mut self, style: RevealStyle) -> Self {
        self.style = style;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let config = RevealConfig::default();
        assert!(config.mask_safety >= 1.0);
        assert!(config.load_timeout >= Duration::from_secs(2));
        assert!(config.load_timeout <= Duration::from_secs(3));
        assert_eq!(config.acquire_attempts, 1);
    }

    #[test]
    fn phase_terminality() {
        assert!(Phase::Done.is_terminal());
        assert!(!Phase::Idle.is_terminal());
        assert!(!Phase::FallbackReveal.is_terminal());
    }

    #[test]
    fn outcome_predicates() {
        assert!(RevealOutcome::Revealed.is_revealed());
        assert!(!RevealOutcome::Fallback(FallbackReason::AnchorMissing).is_revealed());
    }
}
