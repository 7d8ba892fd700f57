//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types so hosts can bring the whole
//! engine surface into scope with a single `use`.
//!
//! # Example
//!
//! ```rust,no_run
//! use pixelflow::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("pipeline.json")?;
//! let def = PipelineDefinition::from_json_str(&json)?;
//! let mut engine = PipelineEngine::from_definition(def);
//!
//! let frame = engine.new_frame(PixelHandle(1), 1024, 768);
//! if let Some(input) = engine.nodes().iter().find(|n| n.node_type.is_source()) {
//!     let id = input.id.clone();
//!     engine.set_input_frame(&id, frame);
//! }
//!
//! let registry = ExecutorRegistry::new();
//! let outcome = engine.run(&registry, &CancelToken::new(), &NullObserver)?;
//! println!("run finished: {:?}", outcome);
//! # Ok(())
//! # }
//! ```

// Engine and run control
pub use crate::engine::{PipelineEngine, RunOutcome};
pub use crate::executor::{
    CancelToken, ExecutionContext, ExecutorRegistry, NodeExecutor, NullObserver, RunObserver,
};

// Pipeline model
pub use crate::pipeline::{
    EdgeDef, NodeDef, NodeId, NodeType, ParamValue, Params, PipelineDefinition, Position,
    PIPELINE_VERSION,
};

// Frames and per-node state
pub use crate::frame::{Frame, PixelHandle, RevisionCounter};
pub use crate::state::{invalidate_downstream, NodeState, NodeStatus, StateMap, StateStore};

// Graph queries
pub use crate::cache::cache_key;
pub use crate::graph::{downstream_of, topo_order, upstream_of, validate};

// Error types
pub use crate::error::{
    CycleError, DefinitionError, ExecutorError, RunError, ValidationError,
};

// Result type alias for convenience
pub type Result<T, E = Box<dyn std::error::Error>> = std::result::Result<T, E>;
