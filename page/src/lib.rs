//! Munky Page Runtime - Headless Orchestration for the Token Page
//!
//! This crate drives everything the MUNKY token page does after load,
//! completely independent of any rendering surface. It can drive a real
//! browser bridge, the in-memory stage shipped here, or run headless for
//! testing and simulation.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      Page Surfaces                        │
//! │   ┌────────────┐  ┌───────────────┐  ┌─────────────────┐ │
//! │   │  Browser   │  │  MemoryStage  │  │    Headless     │ │
//! │   │   bridge   │  │  (in-process) │  │   (page-sim)    │ │
//! │   └──────┬─────┘  └───────┬───────┘  └────────┬────────┘ │
//! │          └────────────────┴───────────────────┘          │
//! │                       Stage trait                        │
//! └──────────────────────────┬───────────────────────────────┘
//!                            │
//! ┌──────────────────────────┼───────────────────────────────┐
//! │                   PAGE RUNTIME CORE                      │
//! │  ┌────────────┐  ┌─────────────┐  ┌───────────────────┐  │
//! │  │   Reveal   │  │    Stats    │  │      Ambient      │  │
//! │  │ Controller │  │   Poller    │  │    Decoration     │  │
//! │  └────────────┘  └─────────────┘  └───────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`reveal::RevealController`]: one-shot intro sequence (hide content,
//!   load a clip, play it, reveal the page through an expanding mask,
//!   tear everything down)
//! - [`market::StatsPoller`]: periodic market-data fetch and render loop
//! - [`decor::DecorField`]: looping decorative elements, idempotently
//!   rebuildable on viewport changes
//! - [`stage::Stage`]: the surface seam all three operate on
//! - [`stage::VisibilityOwner`]: single-writer ownership of "is page
//!   content currently hidden"
//!
//! The three components are independent by design: a failing poller never
//! blocks the reveal and a failed reveal degrades to an immediate,
//! unanimated restore rather than a blocked page.

pub mod config;
pub mod decor;
pub mod market;
pub mod reveal;
pub mod stage;

pub use config::PageConfig;
pub use decor::{DecorField, DecorSpec};
pub use market::{MarketFeed, StatsBoard, StatsPoller, Trend};
pub use reveal::{
    FallbackReason, Media, MediaError, Phase, RevealConfig, RevealController, RevealOutcome,
};
pub use stage::{MemoryStage, NodeId, NodeKind, Point, Rect, Stage, Viewport, VisibilityOwner};
