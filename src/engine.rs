//! The execution coordinator.
//!
//! A [`PipelineEngine`] owns the node/edge definitions, the per-node state
//! arena, the externally provided input frames, and the revision counter. It
//! drives one run at a time: validate, check readiness, order, then walk the
//! order sequentially, consulting the cache before invoking an executor and
//! recording every outcome in the state store.

use crate::cache::cache_key;
use crate::error::{ExecutorError, RunError, ValidationError};
use crate::executor::{CancelToken, ExecutionContext, ExecutorRegistry, RunObserver};
use crate::frame::{Frame, PixelHandle, RevisionCounter};
use crate::graph::{topo_order, upstream_of, validate};
use crate::pipeline::{EdgeDef, NodeDef, NodeId, NodeType, Params, PipelineDefinition};
use crate::state::{invalidate_downstream, NodeState, NodeStatus, StateStore};
use ahash::AHashMap;
use log::{debug, info, warn};

/// How a run ended. Per-node failures do not surface here; they live in the
/// individual node states after the walk completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Cancelled,
}

/// Owns one pipeline and its execution state. No global state is involved;
/// hosts create as many engines as they need and pass them by reference.
pub struct PipelineEngine {
    nodes: Vec<NodeDef>,
    edges: Vec<EdgeDef>,
    store: StateStore,
    input_frames: AHashMap<NodeId, Frame>,
    revisions: RevisionCounter,
    running: bool,
}

impl PipelineEngine {
    pub fn new(nodes: Vec<NodeDef>, edges: Vec<EdgeDef>) -> Self {
        Self {
            nodes,
            edges,
            store: StateStore::new(),
            input_frames: AHashMap::new(),
            revisions: RevisionCounter::new(),
            running: false,
        }
    }

    pub fn from_definition(def: PipelineDefinition) -> Self {
        Self::new(def.nodes, def.edges)
    }

    pub fn nodes(&self) -> &[NodeDef] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeDef] {
        &self.edges
    }

    /// Serializes the current graph back into the exchange format.
    pub fn definition(&self) -> PipelineDefinition {
        PipelineDefinition::new(self.nodes.clone(), self.edges.clone())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stamps a new frame with this engine's next revision. Hosts use this
    /// for the frames they feed into input nodes.
    pub fn new_frame(&self, pixels: PixelHandle, width: u32, height: u32) -> Frame {
        Frame::new(pixels, width, height, self.revisions.next())
    }

    pub fn states(&self) -> &StateStore {
        &self.store
    }

    /// The node's run record, created idle on first reference.
    pub fn node_state(&mut self, node_id: &str) -> &NodeState {
        self.store.get_or_default(node_id)
    }

    /// Applies a partial update to a node's record. Host-facing surface for
    /// fields the engine does not manage itself (e.g. `device_used`).
    pub fn update_state(&mut self, node_id: &str, apply: impl FnOnce(&mut NodeState)) {
        self.store.update(node_id, apply);
    }

    pub fn validate(&self) -> Vec<ValidationError> {
        validate(&self.nodes, &self.edges)
    }

    /// Provides the external image for an input node: the node becomes done
    /// with that frame as output, and everything downstream is invalidated so
    /// the next run recomputes from it.
    pub fn set_input_frame(&mut self, node_id: &str, frame: Frame) {
        self.input_frames.insert(node_id.to_string(), frame);
        self.cascade_invalidate(node_id);
        self.store.update(node_id, |state| {
            state.output = Some(frame);
            state.status = NodeStatus::Done;
            state.cache_key = None;
        });
    }

    pub fn input_frame(&self, node_id: &str) -> Option<&Frame> {
        self.input_frames.get(node_id)
    }

    /// Merges a parameter patch into the node and invalidates it together
    /// with its downstream set.
    pub fn update_node_params(&mut self, node_id: &str, patch: Params) {
        let Some(node) = self.nodes.iter_mut().find(|node| node.id == node_id) else {
            return;
        };
        node.params.extend(patch);
        self.cascade_invalidate(node_id);
    }

    /// Marks a node and its downstream set as needing recomputation.
    pub fn invalidate(&mut self, node_id: &str) {
        self.cascade_invalidate(node_id);
    }

    pub fn add_node(&mut self, node: NodeDef) {
        self.nodes.push(node);
    }

    /// Removes a node together with its incident edges, state record, and
    /// stored input frame. Input and output nodes are kept, as in the editor.
    pub fn remove_node(&mut self, node_id: &str) -> bool {
        let Some(node) = self.nodes.iter().find(|node| node.id == node_id) else {
            return false;
        };
        if node.node_type.is_source() || node.node_type.is_sink() {
            return false;
        }
        self.nodes.retain(|node| node.id != node_id);
        self.edges
            .retain(|edge| edge.source != node_id && edge.target != node_id);
        self.store.remove(node_id);
        self.input_frames.remove(node_id);
        true
    }

    /// Replaces the edge list (canvas rewiring). No cascade is needed: a
    /// rewired node sees a different upstream revision list on the next run
    /// and misses its cache key naturally.
    pub fn set_edges(&mut self, edges: Vec<EdgeDef>) {
        self.edges = edges;
    }

    /// Drops all run state, then re-seeds input nodes from their stored
    /// frames so they present as done again.
    pub fn clear_execution(&mut self) {
        let ids: Vec<NodeId> = self.store.iter().map(|(id, _)| id.clone()).collect();
        for id in ids {
            self.store.update(&id, |state| *state = NodeState::default());
        }
        for (id, frame) in &self.input_frames {
            let frame = *frame;
            self.store.update(id, |state| {
                state.output = Some(frame);
                state.status = NodeStatus::Done;
            });
        }
    }

    /// Executes the pipeline once, sequentially, in topological order.
    ///
    /// Aborts with `Err` before touching any node state if the graph is
    /// structurally invalid or an input node has no provided frame. After
    /// that, per-node failures are recorded on the failing node and the walk
    /// continues; cancellation stops the walk between nodes (or inside a
    /// cooperative executor) without marking anything as errored.
    pub fn run(
        &mut self,
        registry: &ExecutorRegistry,
        cancel: &CancelToken,
        observer: &dyn RunObserver,
    ) -> Result<RunOutcome, RunError> {
        let errors = validate(&self.nodes, &self.edges);
        if !errors.is_empty() {
            return Err(RunError::Validation(errors));
        }

        let missing: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|node| node.node_type.is_source() && !self.input_frames.contains_key(&node.id))
            .map(|node| node.id.clone())
            .collect();
        if !missing.is_empty() {
            return Err(RunError::MissingInput(missing));
        }

        let order = topo_order(&self.nodes, &self.edges).map_err(|cycle| {
            RunError::Validation(vec![ValidationError::Cycle {
                nodes: cycle.unplaced,
            }])
        })?;
        info!("execution order: {:?}", order);

        // Nodes still valid from a prior run keep their state; that is what
        // makes re-runs after a partial edit incremental.
        for node in &self.nodes {
            let status = self.store.get_or_default(&node.id).status;
            if status != NodeStatus::Done && status != NodeStatus::Cached {
                self.store.update(&node.id, |state| {
                    state.status = NodeStatus::Pending;
                    state.progress = 0.0;
                    state.error = None;
                });
                observer.on_status(&node.id, NodeStatus::Pending);
            }
        }

        self.running = true;
        let outcome = self.walk(&order, registry, cancel, observer);
        self.running = false;
        Ok(outcome)
    }

    fn walk(
        &mut self,
        order: &[NodeId],
        registry: &ExecutorRegistry,
        cancel: &CancelToken,
        observer: &dyn RunObserver,
    ) -> RunOutcome {
        for node_id in order {
            if cancel.is_cancelled() {
                debug!("run cancelled before node '{}'", node_id);
                return RunOutcome::Cancelled;
            }

            let Some(node) = self.nodes.iter().find(|node| node.id == *node_id).cloned() else {
                continue;
            };

            let mut inputs = Vec::new();
            let mut revisions = Vec::new();
            for upstream_id in upstream_of(&node.id, &self.edges) {
                // An upstream without output (failed or never run) simply
                // contributes nothing; this node then fails its own
                // input-availability check below, which is how errors
                // cascade without an explicit propagation step.
                if let Some(frame) = self.store.get_or_default(&upstream_id).output {
                    inputs.push(frame);
                    revisions.push(frame.revision);
                }
            }

            let key = cache_key(&node.id, &node.params, &revisions);
            let state = self.store.get_or_default(&node.id);
            if state.cache_key.as_deref() == Some(key.as_str()) && state.output.is_some() {
                self.store
                    .update(&node.id, |state| state.status = NodeStatus::Cached);
                observer.on_status(&node.id, NodeStatus::Cached);
                debug!("node '{}' ({}) cached", node.id, node.node_type);
                continue;
            }

            self.store.update(&node.id, |state| {
                state.status = NodeStatus::Running;
                state.progress = 0.0;
            });
            observer.on_status(&node.id, NodeStatus::Running);
            info!("executing node '{}' ({})", node.id, node.node_type);

            match self.execute_node(&node, &inputs, registry, cancel, observer) {
                Ok(output) => {
                    self.store.update(&node.id, |state| {
                        state.status = NodeStatus::Done;
                        state.progress = 1.0;
                        state.output = Some(output);
                        state.cache_key = Some(key.clone());
                        state.error = None;
                    });
                    observer.on_status(&node.id, NodeStatus::Done);
                    debug!("node '{}' ({}) done", node.id, node.node_type);
                }
                Err(ExecutorError::Cancelled) => {
                    // Stopped, not failed: the node goes back to pending
                    // rather than being left running or marked errored.
                    self.store.update(&node.id, |state| {
                        state.status = NodeStatus::Pending;
                        state.progress = 0.0;
                    });
                    observer.on_status(&node.id, NodeStatus::Pending);
                    debug!("run cancelled inside node '{}'", node.id);
                    return RunOutcome::Cancelled;
                }
                Err(ExecutorError::Failed(message)) => {
                    warn!("node '{}' ({}) failed: {}", node.id, node.node_type, message);
                    self.store.update(&node.id, |state| {
                        state.status = NodeStatus::Error;
                        state.error = Some(message);
                    });
                    observer.on_status(&node.id, NodeStatus::Error);
                    // Sibling branches are independent; keep walking.
                }
            }
        }
        RunOutcome::Completed
    }

    fn execute_node(
        &self,
        node: &NodeDef,
        inputs: &[Frame],
        registry: &ExecutorRegistry,
        cancel: &CancelToken,
        observer: &dyn RunObserver,
    ) -> Result<Frame, ExecutorError> {
        match node.node_type {
            // Input nodes pass their externally provided frame through.
            NodeType::Input => self
                .input_frames
                .get(&node.id)
                .copied()
                .ok_or_else(|| ExecutorError::failed("No input frame")),
            // Output nodes pass their (single) upstream frame through.
            NodeType::Output => inputs
                .first()
                .copied()
                .ok_or_else(|| ExecutorError::failed("No input connected to output node")),
            node_type => {
                let executor = registry.get(node_type).ok_or_else(|| {
                    ExecutorError::Failed(format!(
                        "No executor registered for node type '{node_type}'"
                    ))
                })?;
                if inputs.is_empty() {
                    return Err(ExecutorError::failed("Missing upstream input"));
                }
                let ctx = ExecutionContext::new(&node.id, cancel, observer, &self.revisions);
                executor.execute(&ctx, inputs, &node.params)
            }
        }
    }

    fn cascade_invalidate(&mut self, node_id: &str) {
        debug!("invalidating '{}' and downstream", node_id);
        let edges = &self.edges;
        self.store
            .apply(|states| invalidate_downstream(edges, states, node_id));
    }
}
