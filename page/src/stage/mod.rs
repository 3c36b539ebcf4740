//! Stage Abstraction
//!
//! The stage is the runtime's view of "the page": a viewport, a designated
//! anchor element, a set of injected visual nodes, and one shared piece of
//! mutable state - whether the underlying page content is currently
//! hidden. Every component in this crate talks to the page exclusively
//! through the [`Stage`] trait, which keeps the runtime surface-agnostic:
//! the same controllers drive a browser bridge, the in-memory stage used
//! by tests, or the headless simulator.
//!
//! Content visibility is deliberately not a free-for-all. A
//! [`VisibilityOwner`] is the only value that may hide or restore content,
//! it cannot be cloned, and it restores on drop, so a crashed or cancelled
//! intro sequence can never leave the page permanently blank.

mod memory;

pub use memory::MemoryStage;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decor::DecorSpec;

/// A point in viewport coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// An axis-aligned bounding box in viewport coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Center of the box. This is the reveal's anchor point when the box
    /// belongs to the anchor element.
    #[must_use]
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }
}

/// Current viewport dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Corner-to-corner distance. A circular mask with a radius beyond
    /// this covers the whole viewport from any center point.
    #[must_use]
    pub fn diagonal(&self) -> f32 {
        self.width.hypot(self.height)
    }
}

/// Handle to a node injected into the stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// The kinds of nodes the runtime injects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Full-viewport overlay sitting above page content.
    Overlay,
    /// Surface the intro clip plays on.
    MediaSurface {
        /// Path of the clip shown on this surface.
        source: String,
    },
    /// Expanding circular mask the page is revealed through.
    Mask {
        /// Center of the mask in viewport coordinates.
        center: Point,
    },
    /// One looping decorative element.
    Decor(DecorSpec),
}

/// The page surface seam.
///
/// Implementations are expected to be cheap and non-blocking; all methods
/// are called from async tasks. Mutation goes through `&self` so a single
/// stage can be shared across the independent page components.
pub trait Stage: Send + Sync {
    /// Current viewport dimensions.
    fn viewport(&self) -> Viewport;

    /// Bounding box of the designated anchor element, if it exists right
    /// now. Callers must not cache this across suspension points; layout
    /// may shift while media loads.
    fn anchor_rect(&self) -> Option<Rect>;

    /// Add a node to the stage.
    fn inject(&self, kind: NodeKind) -> NodeId;

    /// Remove a previously injected node. Removing a node that is already
    /// gone is a no-op and returns `false`.
    fn remove(&self, id: NodeId) -> bool;

    /// Set a node's opacity (0.0 = fully transparent).
    fn set_opacity(&self, id: NodeId, opacity: f32);

    /// Set a mask node's radius in viewport units.
    fn set_mask_radius(&self, id: NodeId, radius: f32);

    /// Suppress visibility of all page content except injected nodes.
    /// Reversible; the content and its layout are never destroyed.
    fn hide_content(&self);

    /// Undo [`Stage::hide_content`].
    fn restore_content(&self);

    /// Whether page content is currently suppressed.
    fn content_hidden(&self) -> bool;
}

/// Exclusive ownership of the page's content-visibility state.
///
/// Exactly one owner exists per stage handle that claims one; it is not
/// clonable, so "who may currently hide content" is single-writer by
/// construction rather than by convention. Restoration is idempotent and
/// also happens on drop.
pub struct VisibilityOwner {
    stage: Arc<dyn Stage>,
    hidden: bool,
}

impl std::fmt::Debug for VisibilityOwner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityOwner")
            .field("hidden", &self.hidden)
            .finish_non_exhaustive()
    }
}

impl VisibilityOwner {
    /// Claim visibility ownership over a stage. Content starts visible.
    pub fn claim(stage: Arc<dyn Stage>) -> Self {
        Self {
            stage,
            hidden: false,
        }
    }

    /// Hide page content. No-op if already hidden by this owner.
    pub fn hide(&mut self) {
        if !self.hidden {
            self.stage.hide_content();
            self.hidden = true;
            debug!("page content hidden");
        }
    }

    /// Restore page content. Safe to call any number of times.
    pub fn restore(&mut self) {
        if self.hidden {
            self.stage.restore_content();
            self.hidden = false;
            debug!("page content restored");
        }
    }

    /// Whether this owner currently hides the content.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}

impl Drop for VisibilityOwner {
    fn drop(&mut self) {
        // A dropped owner must never leave the page blanked out.
        self.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_center() {
        let rect = Rect {
            x: 10.0,
            y: 20.0,
            width: 100.0,
            height: 40.0,
        };
        let center = rect.center();
        assert!((center.x - 60.0).abs() < f32::EPSILON);
        assert!((center.y - 40.0).abs() < f32::EPSILON);
    }

    #[test]
    fn viewport_diagonal() {
        let viewport = Viewport {
            width: 300.0,
            height: 400.0,
        };
        assert!((viewport.diagonal() - 500.0).abs() < 0.001);
    }

    #[test]
    fn visibility_owner_round_trip() {
        let stage = Arc::new(MemoryStage::new(Viewport {
            width: 800.0,
            height: 600.0,
        }));
        let mut owner = VisibilityOwner::claim(stage.clone());

        assert!(!stage.content_hidden());
        owner.hide();
        assert!(stage.content_hidden());
        owner.restore();
        assert!(!stage.content_hidden());

        // Idempotent on both sides.
        owner.restore();
        assert!(!stage.content_hidden());
    }

    #[test]
    fn visibility_owner_restores_on_drop() {
        let stage = Arc::new(MemoryStage::new(Viewport {
            width: 800.0,
            height: 600.0,
        }));
        {
            let mut owner = VisibilityOwner::claim(stage.clone() as Arc<dyn Stage>);
            owner.hide();
            assert!(stage.content_hidden());
        }
        assert!(!stage.content_hidden());
    }
}
