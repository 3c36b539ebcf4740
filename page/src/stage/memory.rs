//! In-Memory Stage
//!
//! A [`Stage`] implementation that records everything done to it. This is
//! the surface behind the headless simulator and the lifecycle tests: a
//! test can run the full reveal against a `MemoryStage` and then assert
//! that no injected node survived and content visibility came back.

use std::collections::HashMap;

use parking_lot::Mutex;

use super::{NodeId, NodeKind, Rect, Stage, Viewport};

/// State of one injected node.
#[derive(Clone, Debug)]
pub struct NodeRecord {
    pub kind: NodeKind,
    pub opacity: f32,
    pub mask_radius: f32,
}

#[derive(Debug)]
struct StageState {
    viewport: Viewport,
    anchor: Option<Rect>,
    nodes: HashMap<NodeId, NodeRecord>,
    hidden: bool,
    next_id: u64,
}

/// Recording in-memory page surface.
#[derive(Debug)]
pub struct MemoryStage {
    state: Mutex<StageState>,
}

impl MemoryStage {
    /// Create a stage with the given viewport and no anchor element.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            state: Mutex::new(StageState {
                viewport,
                anchor: None,
                nodes: HashMap::new(),
                hidden: false,
                next_id: 0,
            }),
        }
    }

    /// Create a stage with an anchor element present.
    pub fn with_anchor(viewport: Viewport, anchor: Rect) -> Self {
        let stage = Self::new(viewport);
        stage.set_anchor(Some(anchor));
        stage
    }

    /// Move, replace, or remove the anchor element. Layout shifts while
    /// media loads are simulated by calling this mid-run.
    pub fn set_anchor(&self, anchor: Option<Rect>) {
        self.state.lock().anchor = anchor;
    }

    /// Resize the viewport.
    pub fn set_viewport(&self, viewport: Viewport) {
        self.state.lock().viewport = viewport;
    }

    /// Number of nodes currently on the stage.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.state.lock().nodes.len()
    }

    /// Snapshot of a single node, if still present.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<NodeRecord> {
        self.state.lock().nodes.get(&id).cloned()
    }

    /// Snapshot of every node currently on the stage.
    #[must_use]
    pub fn nodes(&self) -> Vec<(NodeId, NodeRecord)> {
        let state = self.state.lock();
        let mut nodes: Vec<_> = state
            .nodes
            .iter()
            .map(|(id, record)| (*id, record.clone()))
            .collect();
        nodes.sort_by_key(|(id, _)| id.0);
        nodes
    }

    /// Count nodes injected as decoration.
    #[must_use]
    pub fn decor_count(&self) -> usize {
        self.state
            .lock()
            .nodes
            .values()
            .filter(|record| matches!(record.kind, NodeKind::Decor(_)))
            .count()
    }
}

impl Stage for MemoryStage {
    fn viewport(&self) -> Viewport {
        self.state.lock().viewport
    }

    fn anchor_rect(&self) -> Option<Rect> {
        self.state.lock().anchor
    }

    fn inject(&self, kind: NodeKind) -> NodeId {
        let mut state = self.state.lock();
        let id = NodeId(state.next_id);
        state.next_id += 1;
        state.nodes.insert(
            id,
            NodeRecord {
                kind,
                opacity: 1.0,
                mask_radius: 0.0,
            },
        );
        id
    }

    fn remove(&self, id: NodeId) -> bool {
        self.state.lock().nodes.remove(&id).is_some()
    }

    fn set_opacity(&self, id: NodeId, opacity: f32) {
        if let Some(record) = self.state.lock().nodes.get_mut(&id) {
            record.opacity = opacity.clamp(0.0, 1.0);
        }
    }

    fn set_mask_radius(&self, id: NodeId, radius: f32) {
        if let Some(record) = self.state.lock().nodes.get_mut(&id) {
            record.mask_radius = radius.max(0.0);
        }
    }

    fn hide_content(&self) {
        self.state.lock().hidden = true;
    }

    fn restore_content(&self) {
        self.state.lock().hidden = false;
    }

    fn content_hidden(&self) -> bool {
        self.state.lock().hidden
    }
}
