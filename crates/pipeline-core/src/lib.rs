//! Core of the four-stage pipeline hazard simulator.
//!
//! A [`DependencyGraph`] records which instructions need the results of
//! which others. A [`Pipeline`] is fed one [`InstructionRecord`] per graph
//! node and advanced one cycle per call, stalling an instruction once when it
//! depends on the instruction immediately before it.

/// Instruction identities and the slot mapping.
pub mod identity;
pub use identity::{InstructionId, ALPHABET_END, ALPHABET_LEN, ALPHABET_START};

/// Graph and configuration error types.
pub mod error;
pub use error::{ConfigError, GraphError};

/// Host-facing configuration, snapshot and trace contracts.
pub mod api;
pub use api::{
    PipelineStats, SimConfig, SnapshotEntry, TraceEvent, TraceSink, DEFAULT_GRAPH_CAPACITY,
    MAX_INSTRUCTIONS, NOOP_SYMBOL, PIPELINE_DEPTH,
};

/// Fixed-capacity dependency graph.
pub mod graph;
pub use graph::{DependencyGraph, DirectedEdge, GraphNode};

/// Per-instruction pipeline state.
pub mod state;
pub use state::{InstructionRecord, Stage};

/// Cycle-driven pipeline state machine.
pub mod pipeline;
pub use pipeline::Pipeline;

/// Closed-form cycle totals.
pub mod timing;
pub use timing::{
    actual_cycles, ideal_cycles, sequential_cycles, stalls_required, worst_case_cycles,
    CycleReport, BASE_CYCLES_PER_INSTRUCTION,
};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
