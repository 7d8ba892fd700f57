//! The seam between the engine and the code that actually touches pixels.
//!
//! The engine never computes an image itself. Each processing node type is
//! backed by a [`NodeExecutor`] the host registers; the engine hands it the
//! gathered input frames, the node's parameters, and an [`ExecutionContext`]
//! carrying the run's cancellation token and the callback sinks for progress
//! reporting, already scoped to the node being executed.

use crate::error::ExecutorError;
use crate::frame::{Frame, PixelHandle, RevisionCounter};
use crate::pipeline::{NodeType, Params};
use crate::state::NodeStatus;
use ahash::AHashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cooperative cancellation flag for one run.
///
/// The coordinator checks it between nodes; executors are expected to check
/// it during their own long operations (via [`ExecutionContext`]) and return
/// [`ExecutorError::Cancelled`] rather than a generic failure, so a stopped
/// node is never reported as a failed one.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Host-side sink for run events. Every callback carries the id of the node
/// it concerns; for a given node, calls arrive in order, and because only one
/// node executes at a time, calls are totally ordered across the run.
pub trait RunObserver {
    fn on_status(&self, _node_id: &str, _status: NodeStatus) {}
    fn on_progress(&self, _node_id: &str, _progress: f32) {}
    fn on_status_message(&self, _node_id: &str, _message: &str) {}
    fn on_download_progress(&self, _node_id: &str, _progress: f32) {}
}

/// Observer that discards every event.
pub struct NullObserver;

impl RunObserver for NullObserver {}

/// Per-invocation context handed to an executor, scoped to one node.
pub struct ExecutionContext<'run> {
    node_id: &'run str,
    cancel: &'run CancelToken,
    observer: &'run dyn RunObserver,
    revisions: &'run RevisionCounter,
}

impl<'run> ExecutionContext<'run> {
    pub(crate) fn new(
        node_id: &'run str,
        cancel: &'run CancelToken,
        observer: &'run dyn RunObserver,
        revisions: &'run RevisionCounter,
    ) -> Self {
        Self {
            node_id,
            cancel,
            observer,
            revisions,
        }
    }

    pub fn node_id(&self) -> &str {
        self.node_id
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Early-out helper for executor loops: `ctx.ensure_not_cancelled()?;`.
    pub fn ensure_not_cancelled(&self) -> Result<(), ExecutorError> {
        if self.is_cancelled() {
            Err(ExecutorError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Reports execution progress in `[0, 1]` for this node.
    pub fn report_progress(&self, progress: f32) {
        self.observer
            .on_progress(self.node_id, progress.clamp(0.0, 1.0));
    }

    /// Reports a human-readable status line ("loading model", "tiling"...).
    pub fn report_status(&self, message: &str) {
        self.observer.on_status_message(self.node_id, message);
    }

    /// Reports model/weight download progress in `[0, 1]`.
    pub fn report_download_progress(&self, progress: f32) {
        self.observer
            .on_download_progress(self.node_id, progress.clamp(0.0, 1.0));
    }

    /// Stamps a new frame with the engine's next revision.
    pub fn create_frame(&self, pixels: PixelHandle, width: u32, height: u32) -> Frame {
        Frame::new(pixels, width, height, self.revisions.next())
    }
}

/// The contract for executing a single node type.
pub trait NodeExecutor: Send + Sync {
    fn execute(
        &self,
        ctx: &ExecutionContext<'_>,
        inputs: &[Frame],
        params: &Params,
    ) -> Result<Frame, ExecutorError>;
}

/// Maps node types to the executors that implement them. `input` and
/// `output` nodes are handled by the coordinator itself and need no entry.
#[derive(Default)]
pub struct ExecutorRegistry {
    executors: AHashMap<NodeType, Box<dyn NodeExecutor>>,
}

impl ExecutorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, node_type: NodeType, executor: Box<dyn NodeExecutor>) {
        self.executors.insert(node_type, executor);
    }

    /// Builder-style registration.
    pub fn with(mut self, node_type: NodeType, executor: Box<dyn NodeExecutor>) -> Self {
        self.register(node_type, executor);
        self
    }

    pub fn get(&self, node_type: NodeType) -> Option<&dyn NodeExecutor> {
        self.executors.get(&node_type).map(Box::as_ref)
    }
}
