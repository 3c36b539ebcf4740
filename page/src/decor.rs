//! Ambient Decoration
//!
//! Continuously-looping decorative elements that drift up the page. Each
//! element gets an independent random horizontal start, lateral drift,
//! rotation, and animation duration/delay, then loops for the lifetime of
//! the page. The field has no lifecycle beyond that and never touches the
//! reveal or the poller.
//!
//! Rebuilding must be idempotent: a viewport resize calls
//! [`DecorField::scatter`] again, which clears every previously injected
//! element before recreating the full set.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::stage::{NodeId, NodeKind, Stage};

/// Number of decorative elements kept on the page.
pub const DECOR_COUNT: usize = 20;

/// Maximum lateral drift in viewport units, either direction.
const DRIFT_RANGE: f32 = 100.0;

/// Maximum rotation in degrees, either direction.
const ROTATION_RANGE: f32 = 360.0;

/// Animation duration range in seconds.
const DURATION_MIN_SECS: f32 = 5.0;
const DURATION_MAX_SECS: f32 = 15.0;

/// Maximum animation start delay in seconds.
const DELAY_MAX_SECS: f32 = 5.0;

/// Placement and animation parameters for one decorative element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecorSpec {
    /// Horizontal start position as a percentage of viewport width.
    pub left_pct: f32,
    /// Lateral drift over one loop, in viewport units.
    pub drift: f32,
    /// Rotation over one loop, in degrees.
    pub rotation_deg: f32,
    /// Loop duration in seconds.
    pub duration_secs: f32,
    /// Start delay in seconds.
    pub delay_secs: f32,
}

/// A field of looping decorative elements on a stage.
pub struct DecorField {
    stage: Arc<dyn Stage>,
    count: usize,
    rng: StdRng,
    nodes: Vec<NodeId>,
}

impl DecorField {
    /// Create a field with the default element count.
    pub fn new(stage: Arc<dyn Stage>) -> Self {
        Self::with_count(stage, DECOR_COUNT)
    }

    /// Create a field with a specific element count.
    pub fn with_count(stage: Arc<dyn Stage>, count: usize) -> Self {
        Self {
            stage,
            count,
            rng: StdRng::from_entropy(),
            nodes: Vec::new(),
        }
    }

    /// Create a field with a seeded RNG for reproducible placement.
    pub fn with_seed(stage: Arc<dyn Stage>, count: usize, seed: u64) -> Self {
        Self {
            stage,
            count,
            rng: StdRng::seed_from_u64(seed),
            nodes: Vec::new(),
        }
    }

    /// Populate the stage with the full element set.
    ///
    /// Clears every element this field previously injected first, so
    /// calling this again (e.g. on viewport resize) never accumulates
    /// elements.
    pub fn scatter(&mut self) {
        for id in self.nodes.drain(..) {
            self.stage.remove(id);
        }

        for _ in 0..self.count {
            let spec = self.next_spec();
            let id = self.stage.inject(NodeKind::Decor(spec));
            self.nodes.push(id);
        }
        debug!(count = self.count, "decor field scattered");
    }

    /// Remove every element this field owns.
    pub fn clear(&mut self) {
        for id in self.nodes.drain(..) {
            self.stage.remove(id);
        }
    }

    /// Node handles currently owned by the field.
    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    fn next_spec(&mut self) -> DecorSpec {
        DecorSpec {
            left_pct: self.rng.gen::<f32>() * 100.0,
            drift: (self.rng.gen::<f32>() - 0.5) * 2.0 * DRIFT_RANGE,
            rotation_deg: (self.rng.gen::<f32>() - 0.5) * 2.0 * ROTATION_RANGE,
            duration_secs: DURATION_MIN_SECS
                + self.rng.gen::<f32>() * (DURATION_MAX_SECS - DURATION_MIN_SECS),
            delay_secs: self.rng.gen::<f32>() * DELAY_MAX_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::{MemoryStage, Viewport};

    fn stage() -> Arc<MemoryStage> {
        Arc::new(MemoryStage::new(Viewport {
            width: 1280.0,
            height: 720.0,
        }))
    }

    #[test]
    fn scatter_populates_full_set() {
        let stage = stage();
        let mut field = DecorField::with_count(stage.clone(), 20);
        field.scatter();
        assert_eq!(stage.decor_count(), 20);
        assert_eq!(field.nodes().len(), 20);
    }

    #[test]
    fn scatter_is_idempotent() {
        let stage = stage();
        let mut field = DecorField::with_count(stage.clone(), 20);
        field.scatter();
        field.scatter();
        field.scatter();
        // Never accumulates beyond the configured count.
        assert_eq!(stage.decor_count(), 20);
    }

    #[test]
    fn specs_stay_in_range() {
        let stage = stage();
        let mut field = DecorField::with_seed(stage.clone(), 50, 7);
        field.scatter();

        for (_, record) in stage.nodes() {
            let NodeKind::Decor(spec) = record.kind else {
                panic!("expected a decor node");
            };
            assert!((0.0..=100.0).contains(&spec.left_pct));
            assert!(spec.drift.abs() <= DRIFT_RANGE);
            assert!(spec.rotation_deg.abs() <= ROTATION_RANGE);
            assert!((DURATION_MIN_SECS..=DURATION_MAX_SECS).contains(&spec.duration_secs));
            assert!((0.0..=DELAY_MAX_SECS).contains(&spec.delay_secs));
        }
    }

    #[test]
    fn seeded_fields_are_reproducible() {
        let stage_a = stage();
        let stage_b = stage();
        let mut field_a = DecorField::with_seed(stage_a.clone(), 10, 42);
        let mut field_b = DecorField::with_seed(stage_b.clone(), 10, 42);
        field_a.scatter();
        field_b.scatter();

        let specs = |stage: &MemoryStage| -> Vec<DecorSpec> {
            stage
                .nodes()
                .into_iter()
                .filter_map(|(_, record)| match record.kind {
                    NodeKind::Decor(spec) => Some(spec),
                    _ => None,
                })
                .collect()
        };
        assert_eq!(specs(&stage_a), specs(&stage_b));
    }

    #[test]
    fn clear_removes_everything() {
        let stage = stage();
        let mut field = DecorField::with_count(stage.clone(), 5);
        field.scatter();
        field.clear();
        assert_eq!(stage.decor_count(), 0);
        assert!(field.nodes().is_empty());
    }
}
