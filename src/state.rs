//! Per-node run records and the invalidation cascade.

use crate::frame::Frame;
use crate::graph::downstream_of;
use crate::pipeline::{EdgeDef, NodeId};
use ahash::AHashMap;
use serde::Serialize;
use std::fmt;

/// Lifecycle of a node within and across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    #[default]
    Idle,
    Pending,
    Running,
    Done,
    Cached,
    Error,
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeStatus::Idle => "idle",
            NodeStatus::Pending => "pending",
            NodeStatus::Running => "running",
            NodeStatus::Done => "done",
            NodeStatus::Cached => "cached",
            NodeStatus::Error => "error",
        };
        f.write_str(name)
    }
}

/// Run record for one node. Created lazily on first reference; mutated only
/// by the coordinator and the invalidation cascade; removed only when the
/// owning node is removed from the graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeState {
    pub status: NodeStatus,
    pub progress: f32,
    pub error: Option<String>,
    pub output: Option<Frame>,
    pub cache_key: Option<String>,
    pub device_used: Option<String>,
}

/// Arena of node records addressed by stable id.
pub type StateMap = AHashMap<NodeId, NodeState>;

/// Keyed store over [`NodeState`] records with lazy defaults.
#[derive(Debug, Default)]
pub struct StateStore {
    states: StateMap,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, node_id: &str) -> Option<&NodeState> {
        self.states.get(node_id)
    }

    /// Returns the node's record, creating an idle one on first reference.
    pub fn get_or_default(&mut self, node_id: &str) -> &NodeState {
        self.states.entry(node_id.to_string()).or_default()
    }

    /// Applies a partial update to the node's record, creating it if needed.
    pub fn update(&mut self, node_id: &str, apply: impl FnOnce(&mut NodeState)) {
        apply(self.states.entry(node_id.to_string()).or_default());
    }

    pub fn remove(&mut self, node_id: &str) {
        self.states.remove(node_id);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &NodeState)> {
        self.states.iter()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Rewrites the whole arena through a pure transformation such as
    /// [`invalidate_downstream`].
    pub fn apply(&mut self, transform: impl FnOnce(StateMap) -> StateMap) {
        let states = std::mem::take(&mut self.states);
        self.states = transform(states);
    }
}

/// The invalidation cascade as a pure function over the arena.
///
/// Clears `cache_key` and `output` and resets status to idle for `node_id`
/// and for everything in `downstream_of(node_id)`. Nothing is re-run here; a
/// later run finds the cleared keys and recomputes exactly the affected
/// subgraph instead of reporting stale cached hits.
pub fn invalidate_downstream(edges: &[EdgeDef], mut states: StateMap, node_id: &str) -> StateMap {
    let mut affected = vec![node_id.to_string()];
    affected.extend(downstream_of(node_id, edges));

    for id in affected {
        let state = states.entry(id).or_default();
        state.status = NodeStatus::Idle;
        state.cache_key = None;
        state.output = None;
    }
    states
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{Frame, PixelHandle};

    fn done_state(revision: u64) -> NodeState {
        NodeState {
            status: NodeStatus::Done,
            progress: 1.0,
            output: Some(Frame::new(PixelHandle(0), 8, 8, revision)),
            cache_key: Some("abcd".to_string()),
            ..NodeState::default()
        }
    }

    #[test]
    fn store_creates_idle_records_lazily() {
        let mut store = StateStore::new();
        assert!(store.get("n1").is_none());
        assert_eq!(store.get_or_default("n1").status, NodeStatus::Idle);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn cascade_clears_node_and_descendants_only() {
        let edges = vec![
            EdgeDef::new("e1", "a", "b"),
            EdgeDef::new("e2", "b", "c"),
            EdgeDef::new("e3", "x", "y"),
        ];
        let mut states = StateMap::default();
        for id in ["a", "b", "c", "x", "y"] {
            states.insert(id.to_string(), done_state(1));
        }

        let states = invalidate_downstream(&edges, states, "b");

        for id in ["b", "c"] {
            let state = &states[id];
            assert_eq!(state.status, NodeStatus::Idle);
            assert!(state.output.is_none());
            assert!(state.cache_key.is_none());
        }
        for id in ["a", "x", "y"] {
            assert_eq!(states[id].status, NodeStatus::Done);
            assert!(states[id].output.is_some());
        }
    }
}
