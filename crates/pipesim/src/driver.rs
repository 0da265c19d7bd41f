//! Feeds a loaded program through the pipeline and records what it does.

use pipeline_core::{
    CycleReport, DependencyGraph, DirectedEdge, InstructionId, InstructionRecord, Pipeline,
    PipelineStats, SimConfig, SnapshotEntry, TraceEvent,
};
use serde::Serialize;
use tracing::debug;

/// Pipeline occupancy after one productive cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleFrame {
    /// Cycle number, starting at 1.
    pub cycle: u32,
    /// Occupied slots from newest to oldest.
    pub entries: Vec<SnapshotEntry>,
}

/// One dependency recorded in the program graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dependency {
    /// Dependent instruction.
    pub from: InstructionId,
    /// Target and weight.
    #[serde(flatten)]
    pub edge: DirectedEdge,
}

/// Every edge of `graph`, ordered by source and then destination.
#[must_use]
pub fn dependencies(graph: &DependencyGraph) -> Vec<Dependency> {
    graph
        .iter()
        .flat_map(|node| {
            node.edges().map(move |edge| Dependency {
                from: node.id(),
                edge,
            })
        })
        .collect()
}

/// Everything one simulation run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationOutcome {
    /// Closed-form totals derived from the graph.
    pub report: CycleReport,
    /// Program dependencies the totals were derived from.
    pub dependencies: Vec<Dependency>,
    /// Final pipeline counters.
    pub stats: PipelineStats,
    /// Rendered cycles in order.
    pub frames: Vec<CycleFrame>,
    /// Trace events, empty unless tracing was enabled.
    pub events: Vec<TraceEvent>,
}

/// Queues one record per graph node in ascending identity order.
///
/// Returns the number of records queued.
pub fn feed_pipeline(graph: &DependencyGraph, pipeline: &mut Pipeline) -> usize {
    let mut queued = 0;
    for id in graph.ids() {
        pipeline.insert_instruction(InstructionRecord::new(id, graph.depends_on_predecessor(id)));
        queued += 1;
    }
    queued
}

/// Advances `pipeline` until a cycle does no work for a program instruction.
///
/// `on_cycle` sees every productive cycle, except the first one when
/// `config.render_first_cycle` is false. Returns the trace events collected
/// when `config.tracing_enabled` is set.
pub fn run_overlapped<F>(
    pipeline: &mut Pipeline,
    config: &SimConfig,
    mut on_cycle: F,
) -> Vec<TraceEvent>
where
    F: FnMut(u32, &[SnapshotEntry]),
{
    let mut events: Vec<TraceEvent> = Vec::new();

    loop {
        let productive = if config.tracing_enabled {
            pipeline.advance_cycle_traced(&mut events)
        } else {
            pipeline.advance_cycle()
        };
        if !productive {
            break;
        }

        let cycle = pipeline.cycle();
        if cycle == 1 && !config.render_first_cycle {
            continue;
        }
        on_cycle(cycle, &pipeline.snapshot());
    }

    debug!(
        cycles = pipeline.cycle(),
        stalls = pipeline.stall_count(),
        completed = pipeline.completed_count(),
        "pipeline drained"
    );
    events
}

/// Runs `graph` through a fresh pipeline.
#[must_use]
pub fn simulate(graph: &DependencyGraph, config: &SimConfig) -> SimulationOutcome {
    let mut pipeline = Pipeline::new();
    let queued = feed_pipeline(graph, &mut pipeline);
    debug!(queued, "program queued");

    let mut frames = Vec::new();
    let events = run_overlapped(&mut pipeline, config, |cycle, entries| {
        frames.push(CycleFrame {
            cycle,
            entries: entries.to_vec(),
        });
    });

    SimulationOutcome {
        report: CycleReport::from_graph(graph),
        dependencies: dependencies(graph),
        stats: pipeline.stats(),
        frames,
        events,
    }
}
