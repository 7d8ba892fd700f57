use crate::pipeline::NodeId;
use itertools::Itertools;
use thiserror::Error;

/// Errors that can occur while loading a pipeline definition document.
#[derive(Error, Debug, Clone)]
pub enum DefinitionError {
    #[error("Failed to parse pipeline JSON: {0}")]
    Json(String),

    #[error("Unsupported pipeline version {found} (this engine reads version {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Could not read pipeline file '{path}': {message}")]
    Io { path: String, message: String },
}

/// Structural problems found by the validator. Checks are independent and
/// collected together; execution never starts while any of these exist.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Edge '{edge_id}' references missing node '{node_id}'")]
    DanglingEdge { edge_id: String, node_id: NodeId },

    #[error("Pipeline contains a cycle through nodes [{}]", .nodes.join(", "))]
    Cycle { nodes: Vec<NodeId> },

    #[error("Source node '{node_id}' cannot have incoming edges")]
    SourceHasInput { node_id: NodeId },

    #[error("Sink node '{node_id}' cannot have outgoing edges")]
    SinkHasOutput { node_id: NodeId },

    #[error("Node '{node_id}' receives more than one edge on handle '{handle}'")]
    DuplicateInput { node_id: NodeId, handle: String },
}

/// Ordering failure: one or more nodes could never reach in-degree zero.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Topological ordering failed, cycle through nodes [{}]", .unplaced.join(", "))]
pub struct CycleError {
    pub unplaced: Vec<NodeId>,
}

/// Conditions that abort a run before any node state is touched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunError {
    #[error("Pipeline is not valid:\n{}", .0.iter().join("\n"))]
    Validation(Vec<ValidationError>),

    #[error("No input frame provided for input node(s) [{}]", .0.join(", "))]
    MissingInput(Vec<NodeId>),
}

/// Failure conditions raised by a node executor. `Cancelled` is a distinguished
/// stop condition, not an error: the coordinator halts the walk without marking
/// the node as errored.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutorError {
    #[error("Cancelled")]
    Cancelled,

    #[error("{0}")]
    Failed(String),
}

impl ExecutorError {
    /// Convenience constructor for a generic failure with a message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}
