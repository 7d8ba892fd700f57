//! Common test utilities for building pipelines and mock executors.
use pixelflow::prelude::*;
use std::cell::RefCell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[allow(dead_code)]
pub fn node(id: &str, node_type: NodeType) -> NodeDef {
    NodeDef::new(id, node_type, Position::default())
}

#[allow(dead_code)]
pub fn edge(id: &str, source: &str, target: &str) -> EdgeDef {
    EdgeDef::new(id, source, target)
}

/// The canonical three-step pipeline: `input -> remove-bg -> output`.
#[allow(dead_code)]
pub fn linear_pipeline() -> (Vec<NodeDef>, Vec<EdgeDef>) {
    (
        vec![
            node("in", NodeType::Input),
            node("bg", NodeType::RemoveBg),
            node("out", NodeType::Output),
        ],
        vec![edge("e1", "in", "bg"), edge("e2", "bg", "out")],
    )
}

/// Two branches off one input:
/// `in -> bg -> line` and `in -> norm`.
/// `norm` shares no ancestry with `bg`, so a failure in `bg` must not
/// affect it.
#[allow(dead_code)]
pub fn branching_pipeline() -> (Vec<NodeDef>, Vec<EdgeDef>) {
    (
        vec![
            node("in", NodeType::Input),
            node("bg", NodeType::RemoveBg),
            node("line", NodeType::Outline),
            node("norm", NodeType::Normalize),
        ],
        vec![
            edge("e1", "in", "bg"),
            edge("e2", "bg", "line"),
            edge("e3", "in", "norm"),
        ],
    )
}

/// Pass-through executor that counts its invocations.
#[allow(dead_code)]
pub struct CountingExecutor {
    pub calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl CountingExecutor {
    pub fn new() -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

impl NodeExecutor for CountingExecutor {
    fn execute(
        &self,
        ctx: &ExecutionContext<'_>,
        inputs: &[Frame],
        _params: &Params,
    ) -> Result<Frame, ExecutorError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        ctx.ensure_not_cancelled()?;
        let input = inputs[0];
        Ok(ctx.create_frame(input.pixels, input.width, input.height))
    }
}

/// Executor that always fails with the given message.
#[allow(dead_code)]
pub struct FailingExecutor(pub &'static str);

impl NodeExecutor for FailingExecutor {
    fn execute(
        &self,
        _ctx: &ExecutionContext<'_>,
        _inputs: &[Frame],
        _params: &Params,
    ) -> Result<Frame, ExecutorError> {
        Err(ExecutorError::failed(self.0))
    }
}

/// Executor that succeeds but trips the shared cancellation token, so the
/// coordinator stops before starting the next node.
#[allow(dead_code)]
pub struct CancelAfterExecutor {
    pub cancel: CancelToken,
}

impl NodeExecutor for CancelAfterExecutor {
    fn execute(
        &self,
        ctx: &ExecutionContext<'_>,
        inputs: &[Frame],
        _params: &Params,
    ) -> Result<Frame, ExecutorError> {
        let input = inputs[0];
        let output = ctx.create_frame(input.pixels, input.width, input.height);
        self.cancel.cancel();
        Ok(output)
    }
}

/// Executor that observes cancellation mid-work and raises the distinguished
/// cancellation condition.
#[allow(dead_code)]
pub struct CancelledExecutor;

impl NodeExecutor for CancelledExecutor {
    fn execute(
        &self,
        _ctx: &ExecutionContext<'_>,
        _inputs: &[Frame],
        _params: &Params,
    ) -> Result<Frame, ExecutorError> {
        Err(ExecutorError::Cancelled)
    }
}

/// Observer that records every status transition in order.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingObserver {
    pub events: RefCell<Vec<(String, NodeStatus)>>,
}

impl RunObserver for RecordingObserver {
    fn on_status(&self, node_id: &str, status: NodeStatus) {
        self.events
            .borrow_mut()
            .push((node_id.to_string(), status));
    }
}
