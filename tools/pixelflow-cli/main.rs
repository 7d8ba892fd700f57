use clap::Parser;
use pixelflow::prelude::*;
use std::time::Instant;

/// A graph-based image pipeline runner CLI.
///
/// Loads a pipeline definition, validates it, and executes it with
/// pass-through stand-in executors, printing the per-node results. Useful for
/// checking pipeline documents and observing scheduling, caching, and
/// partial-failure behavior without any model inference.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the pipeline definition JSON file
    pipeline_path: String,

    /// Width of the stand-in frame fed to each input node
    #[arg(long, default_value_t = 1024)]
    width: u32,

    /// Height of the stand-in frame fed to each input node
    #[arg(long, default_value_t = 768)]
    height: u32,

    /// Only validate and print the execution order, without running
    #[arg(short = 'c', long)]
    check: bool,

    /// Run the pipeline twice to demonstrate cache hits
    #[arg(long)]
    twice: bool,
}

/// Stand-in executor: forwards the first input frame with a fresh revision,
/// reporting progress along the way.
struct PassThrough;

impl NodeExecutor for PassThrough {
    fn execute(
        &self,
        ctx: &ExecutionContext<'_>,
        inputs: &[Frame],
        _params: &Params,
    ) -> Result<Frame, ExecutorError> {
        ctx.ensure_not_cancelled()?;
        ctx.report_progress(0.5);
        let input = inputs[0];
        Ok(ctx.create_frame(input.pixels, input.width, input.height))
    }
}

/// Prints every status transition as it happens.
struct ConsoleObserver;

impl RunObserver for ConsoleObserver {
    fn on_status(&self, node_id: &str, status: NodeStatus) {
        println!("  [{node_id}] -> {status}");
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    // --- 1. Load ---
    let load_start = Instant::now();
    let def = PipelineDefinition::from_file(&cli.pipeline_path)
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));
    let load_duration = load_start.elapsed();
    println!(
        "Loaded pipeline '{}': {} nodes, {} edges",
        cli.pipeline_path,
        def.nodes.len(),
        def.edges.len()
    );

    // --- 2. Validate ---
    let errors = validate(&def.nodes, &def.edges);
    if !errors.is_empty() {
        let joined: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        exit_with_error(&format!(
            "Pipeline is not valid:\n{}",
            joined.join("\n")
        ));
    }

    let order = topo_order(&def.nodes, &def.edges)
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));
    println!("Execution order: {}", order.join(" -> "));

    if cli.check {
        println!("Pipeline is valid.");
        return;
    }

    // --- 3. Assemble engine and stand-in executors ---
    let mut engine = PipelineEngine::from_definition(def);

    let input_ids: Vec<NodeId> = engine
        .nodes()
        .iter()
        .filter(|node| node.node_type.is_source())
        .map(|node| node.id.clone())
        .collect();
    for (index, id) in input_ids.iter().enumerate() {
        let frame = engine.new_frame(PixelHandle(index as u64 + 1), cli.width, cli.height);
        engine.set_input_frame(id, frame);
    }

    let mut registry = ExecutorRegistry::new();
    for node_type in NodeType::ALL {
        if !node_type.is_source() && !node_type.is_sink() {
            registry.register(node_type, Box::new(PassThrough));
        }
    }

    // --- 4. Run ---
    let passes = if cli.twice { 2 } else { 1 };
    let cancel = CancelToken::new();
    for pass in 1..=passes {
        println!("\nRun {pass}:");
        let run_start = Instant::now();
        let outcome = engine
            .run(&registry, &cancel, &ConsoleObserver)
            .unwrap_or_else(|e| exit_with_error(&e.to_string()));
        let run_duration = run_start.elapsed();

        println!("\n--- Node Summary (run {pass}) ---");
        print_summary(&mut engine, &order);
        println!("Outcome: {outcome:?} in {run_duration:?}");
    }

    println!("\nFile loading took {load_duration:?}");
}

fn print_summary(engine: &mut PipelineEngine, order: &[NodeId]) {
    for id in order {
        let node_type = engine
            .nodes()
            .iter()
            .find(|node| node.id == *id)
            .map(|node| node.node_type.to_string())
            .unwrap_or_default();
        let state = engine.node_state(id).clone();
        let revision = state
            .output
            .map(|frame| frame.revision.to_string())
            .unwrap_or_else(|| "-".to_string());
        let error = state.error.as_deref().unwrap_or("-");
        println!(
            "  {id:<12} {node_type:<12} {status:<8} rev {revision:<6} {error}",
            status = state.status.to_string()
        );
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
