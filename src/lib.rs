//! # Pixelflow - Image Pipeline Execution Engine
//!
//! **Pixelflow** schedules directed graphs of image-transform steps and
//! executes them incrementally: every node's output is fingerprinted by a
//! content-addressed cache key, so re-running an unchanged graph skips every
//! executor, and editing one node recomputes only the affected subgraph.
//!
//! The engine never touches pixels. Each processing step is carried out by a
//! host-registered [`executor::NodeExecutor`]; the engine validates the
//! graph, orders it deterministically, gathers each node's input frames,
//! decides skip-vs-recompute, and records per-node status, progress, and
//! errors. Cancellation is cooperative, and a failing node stops only its own
//! descendants; independent branches keep running.
//!
//! ## Core Workflow
//!
//! 1. **Load**: parse a pipeline document with
//!    [`pipeline::PipelineDefinition::from_json_str`] (or build
//!    [`pipeline::NodeDef`]s/[`pipeline::EdgeDef`]s directly).
//! 2. **Assemble**: create a [`engine::PipelineEngine`] from the definition
//!    and provide a frame for every input node.
//! 3. **Register**: map each processing node type to an executor in an
//!    [`executor::ExecutorRegistry`].
//! 4. **Run**: call [`engine::PipelineEngine::run`] with a cancellation token
//!    and an observer; inspect the per-node states afterwards.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pixelflow::prelude::*;
//!
//! struct Blur;
//!
//! impl NodeExecutor for Blur {
//!     fn execute(
//!         &self,
//!         ctx: &ExecutionContext<'_>,
//!         inputs: &[Frame],
//!         _params: &Params,
//!     ) -> Result<Frame, ExecutorError> {
//!         ctx.ensure_not_cancelled()?;
//!         ctx.report_progress(0.5);
//!         let input = inputs[0];
//!         // A real executor would transform pixels here.
//!         Ok(ctx.create_frame(input.pixels, input.width, input.height))
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut engine = PipelineEngine::new(
//!         vec![
//!             NodeDef::new("in", NodeType::Input, Position::default()),
//!             NodeDef::new("bg", NodeType::RemoveBg, Position::default()),
//!             NodeDef::new("out", NodeType::Output, Position::default()),
//!         ],
//!         vec![EdgeDef::new("e1", "in", "bg"), EdgeDef::new("e2", "bg", "out")],
//!     );
//!
//!     let frame = engine.new_frame(PixelHandle(1), 1024, 768);
//!     engine.set_input_frame("in", frame);
//!
//!     let registry = ExecutorRegistry::new().with(NodeType::RemoveBg, Box::new(Blur));
//!     let cancel = CancelToken::new();
//!
//!     engine.run(&registry, &cancel, &NullObserver)?;
//!     assert_eq!(engine.node_state("out").status, NodeStatus::Done);
//!
//!     // Nothing changed, so a second run is served entirely from cache.
//!     engine.run(&registry, &cancel, &NullObserver)?;
//!     assert_eq!(engine.node_state("bg").status, NodeStatus::Cached);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod engine;
pub mod error;
pub mod executor;
pub mod frame;
pub mod graph;
pub mod pipeline;
pub mod prelude;
pub mod state;
