//! Media Acquisition
//!
//! The [`Media`] seam covers the failure-prone half of the intro: getting
//! a clip to a playable state and starting playback. The controller only
//! cares about three signals - ready, load error, and playback rejection -
//! so the trait is exactly that narrow.
//!
//! [`ScriptedMedia`] is a deliberately public test double (the lifecycle
//! integration tests and the simulator both need it); it records whether
//! playback was ever reached, which is how the tests prove that a late
//! readiness signal after a timeout is genuinely ignored.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::time::sleep;
use tracing::debug;

/// Containers the media surface knows how to play.
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov"];

/// Errors from media acquisition and playback.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The clip does not exist at the fixed path.
    #[error("media not found: {0}")]
    NotFound(String),

    /// The clip exists but is not a playable container.
    #[error("unsupported media container: {0}")]
    Unsupported(String),

    /// Reading the clip failed.
    #[error("failed to read media: {0}")]
    Io(#[from] std::io::Error),

    /// The clip could not be decoded.
    #[error("decode failed: {0}")]
    Decode(String),

    /// Playback start was rejected.
    #[error("playback rejected: {0}")]
    Playback(String),
}

/// A playable intro media resource.
#[async_trait]
pub trait Media: Send {
    /// Acquire the resource. Resolves once it is playable.
    async fn acquire(&mut self) -> Result<(), MediaError>;

    /// Begin playback of an acquired resource.
    async fn play(&mut self) -> Result<(), MediaError>;
}

/// The on-disk intro clip at its fixed, well-known path.
#[derive(Debug)]
pub struct AssetMedia {
    path: PathBuf,
}

impl AssetMedia {
    /// Reference the clip at `path`. Nothing is touched until
    /// [`Media::acquire`] runs.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The clip path.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl Media for AssetMedia {
    async fn acquire(&mut self) -> Result<(), MediaError> {
        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if !VIDEO_EXTENSIONS.contains(&extension.as_str()) {
            return Err(MediaError::Unsupported(self.path.display().to_string()));
        }

        let metadata = tokio::fs::metadata(&self.path).await.map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                MediaError::NotFound(self.path.display().to_string())
            } else {
                MediaError::Io(err)
            }
        })?;
        if !metadata.is_file() {
            return Err(MediaError::NotFound(self.path.display().to_string()));
        }

        debug!(path = %self.path.display(), size = metadata.len(), "intro clip acquired");
        Ok(())
    }

    async fn play(&mut self) -> Result<(), MediaError> {
        // Decoding happens on the surface; starting playback of an
        // acquired on-disk clip has nothing left to fail on.
        debug!(path = %self.path.display(), "playback started");
        Ok(())
    }
}

/// Shared observation handle for a [`ScriptedMedia`].
#[derive(Clone, Debug, Default)]
pub struct MediaProbe {
    acquired: Arc<AtomicBool>,
    played: Arc<AtomicBool>,
}

impl MediaProbe {
    /// Whether `acquire` ever resolved successfully.
    #[must_use]
    pub fn acquire_completed(&self) -> bool {
        self.acquired.load(Ordering::SeqCst)
    }

    /// Whether playback was ever reached.
    #[must_use]
    pub fn play_reached(&self) -> bool {
        self.played.load(Ordering::SeqCst)
    }
}

/// Scripted media resource for tests and the headless simulator.
#[derive(Debug)]
pub struct ScriptedMedia {
    ready_after: Duration,
    load_error: bool,
    reject_play: bool,
    probe: MediaProbe,
}

impl ScriptedMedia {
    /// Media that is ready immediately.
    pub fn ready() -> Self {
        Self::ready_after(Duration::ZERO)
    }

    /// Media that becomes ready after `delay`.
    pub fn ready_after(delay: Duration) -> Self {
        Self {
            ready_after: delay,
            load_error: false,
            reject_play: false,
            probe: MediaProbe::default(),
        }
    }

    /// Media that signals a load error after `delay`.
    pub fn failing_after(delay: Duration) -> Self {
        Self {
            ready_after: delay,
            load_error: true,
            reject_play: false,
            probe: MediaProbe::default(),
        }
    }

    /// Media that loads fine but rejects playback start.
    pub fn rejecting_play() -> Self {
        Self {
            ready_after: Duration::ZERO,
            load_error: false,
            reject_play: true,
            probe: MediaProbe::default(),
        }
    }

    /// Observation handle that outlives the media value.
    #[must_use]
    pub fn probe(&self) -> MediaProbe {
        self.probe.clone()
    }
}

#[async_trait]
impl Media for ScriptedMedia {
    async fn acquire(&mut self) -> Result<(), MediaError> {
        sleep(self.ready_after).await;
        if self.load_error {
            return Err(MediaError::Decode("scripted load failure".to_string()));
        }
        self.probe.acquired.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn play(&mut self) -> Result<(), MediaError> {
        if self.reject_play {
            return Err(MediaError::Playback("scripted rejection".to_string()));
        }
        self.probe.played.store(true, Ordering::SeqCst);
        Ok(())
    }
}
